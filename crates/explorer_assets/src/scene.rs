use explorer_core::{ViewParameters, cube, orientation::wrap_angle};
use serde::{Deserialize, Serialize};

/// One resolution tier of a scene's tile pyramid.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub tile_size: u32,
    pub size: u32,
    // Single low-res image for clients that can't stream tiles
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_only: bool,
}

impl Level {
    pub fn new(tile_size: u32, size: u32) -> Self {
        Self {
            tile_size,
            size,
            fallback_only: false,
        }
    }

    pub fn fallback(tile_size: u32, size: u32) -> Self {
        Self {
            tile_size,
            size,
            fallback_only: true,
        }
    }

    /// Number of tiles along one edge of a cube face.
    pub fn tiles_per_side(&self) -> u32 {
        if self.tile_size == 0 {
            return 0;
        }
        self.size.div_ceil(self.tile_size)
    }

    /// Tiles across all six cube faces.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.tiles_per_side())
            .pow(2)
            .saturating_mul(cube::CubeFace::ALL.len() as u64)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LinkHotspot {
    pub yaw: f64,
    pub pitch: f64,
    pub rotation: f64,
    pub target: String,
}

impl LinkHotspot {
    /// Arrow icon rotation folded into (-PI, PI].
    pub fn arrow_angle(&self) -> f64 {
        wrap_angle(self.rotation)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfoHotspot {
    pub yaw: f64,
    pub pitch: f64,
    pub title: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

/// A single panorama node of the tour.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub levels: Vec<Level>,
    pub face_size: u32,
    pub initial_view_parameters: ViewParameters,
    pub link_hotspots: Vec<LinkHotspot>,
    pub info_hotspots: Vec<InfoHotspot>,
}

impl Scene {
    /// Levels that take part in tile streaming, lowest resolution first.
    pub fn selectable_levels(&self) -> impl Iterator<Item = (usize, &Level)> {
        self.levels
            .iter()
            .enumerate()
            .filter(|(_, level)| !level.fallback_only)
    }

    pub fn fallback_level(&self) -> Option<&Level> {
        self.levels.iter().find(|level| level.fallback_only)
    }

    /// Pixel on the source cube face under a yaw/pitch position.
    pub fn face_pixel(&self, yaw: f64, pitch: f64) -> Option<cube::FacePixel> {
        cube::locate(yaw, pitch, self.face_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        Scene {
            id: "0-gate".into(),
            name: "gate".into(),
            levels: vec![Level::fallback(256, 256), Level::new(512, 512), Level::new(512, 2048)],
            face_size: 2048,
            initial_view_parameters: ViewParameters::default(),
            link_hotspots: vec![],
            info_hotspots: vec![],
        }
    }

    #[test]
    fn tiles_per_side_rounds_up() {
        assert_eq!(Level::new(512, 2048).tiles_per_side(), 4);
        assert_eq!(Level::new(512, 1000).tiles_per_side(), 2);
        assert_eq!(Level::new(0, 1000).tiles_per_side(), 0);
    }

    #[test]
    fn tile_count_does_not_overflow() {
        assert_eq!(Level::new(512, 1024).tile_count(), 24);
        assert_eq!(Level::new(1, 70_000).tile_count(), 6 * 70_000 * 70_000);
        assert!(Level::new(1, u32::MAX).tile_count() > u64::from(u32::MAX));
    }

    #[test]
    fn selectable_levels_skip_fallback() {
        let scene = sample_scene();
        let indices: Vec<usize> = scene.selectable_levels().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(scene.fallback_level(), Some(&Level::fallback(256, 256)));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let level: Level = serde_json::from_str(r#"{"tileSize": 512, "size": 512}"#).unwrap();
        assert!(!level.fallback_only);

        let info: InfoHotspot =
            serde_json::from_str(r#"{"yaw": 0, "pitch": 0, "title": "t", "text": "x"}"#).unwrap();
        assert_eq!(info.audio_file, None);
    }

    #[test]
    fn absent_optionals_are_not_written() {
        let json = serde_json::to_string(&Level::new(512, 512)).unwrap();
        assert_eq!(json, r#"{"tileSize":512,"size":512}"#);

        let json = serde_json::to_string(&Level::fallback(256, 256)).unwrap();
        assert!(json.contains(r#""fallbackOnly":true"#));
    }

    #[test]
    fn arrow_angle_is_folded() {
        let link = LinkHotspot {
            yaw: 0.0,
            pitch: 0.0,
            rotation: 7.853981633974483,
            target: "x".into(),
        };
        assert!((link.arrow_angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn face_pixel_uses_face_size() {
        let scene = sample_scene();
        let pixel = scene.face_pixel(0.0, 0.0).unwrap();
        assert_eq!((pixel.x, pixel.y), (1024, 1024));
    }
}
