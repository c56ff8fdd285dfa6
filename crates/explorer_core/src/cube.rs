use crate::orientation::direction_from;

/// One face of the cube map a panorama is tiled into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Front,
    Right,
    Back,
    Left,
    Up,
    Down,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Right,
        CubeFace::Back,
        CubeFace::Left,
        CubeFace::Up,
        CubeFace::Down,
    ];

    /// Single letter used in tile paths.
    pub fn letter(self) -> char {
        match self {
            CubeFace::Front => 'f',
            CubeFace::Right => 'r',
            CubeFace::Back => 'b',
            CubeFace::Left => 'l',
            CubeFace::Up => 'u',
            CubeFace::Down => 'd',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FacePixel {
    pub face: CubeFace,
    pub x: u32,
    pub y: u32,
}

/// Maps a yaw/pitch direction onto a pixel of a cube face `face_size` wide.
///
/// Rows grow downwards on every face. Returns `None` for an empty face.
pub fn locate(yaw: f64, pitch: f64, face_size: u32) -> Option<FacePixel> {
    if face_size == 0 {
        return None;
    }

    let d = direction_from(yaw, pitch);
    let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());

    // (face, u, v) with u/v in [-1, 1]
    let (face, u, v) = if az >= ax && az >= ay {
        if d.z < 0.0 {
            (CubeFace::Front, d.x / az, -d.y / az)
        } else {
            (CubeFace::Back, -d.x / az, -d.y / az)
        }
    } else if ax >= ay {
        if d.x > 0.0 {
            (CubeFace::Right, d.z / ax, -d.y / ax)
        } else {
            (CubeFace::Left, -d.z / ax, -d.y / ax)
        }
    } else if d.y > 0.0 {
        (CubeFace::Up, d.x / ay, -d.z / ay)
    } else {
        (CubeFace::Down, d.x / ay, d.z / ay)
    };

    let to_pixel = |t: f64| {
        let px = ((t + 1.0) * 0.5 * face_size as f64).floor();
        (px.max(0.0) as u32).min(face_size - 1)
    };

    Some(FacePixel {
        face,
        x: to_pixel(u),
        y: to_pixel(v),
    })
}
