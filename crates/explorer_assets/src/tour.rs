use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::TourError,
    scene::{Level, Scene},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MouseViewMode {
    /// Grab the panorama and pull it around
    #[default]
    Drag,
    /// QuickTime VR style: pointer offset sets the turning speed
    Qtvr,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TourSettings {
    pub mouse_view_mode: MouseViewMode,
    pub autorotate_enabled: bool,
    pub fullscreen_button: bool,
    pub view_control_buttons: bool,
}

/// The tour exactly as it is stored on disk.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TourDocument {
    pub scenes: Vec<Scene>,
    pub name: String,
    pub settings: TourSettings,
}

/// Index of a scene inside a loaded [`Tour`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneIndex(pub usize);

/// A validated, immutable tour.
///
/// Scenes live in one vector; ids and link targets are resolved to indices
/// once at load time so lookups and navigation never scan.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    name: String,
    settings: TourSettings,
    scenes: Vec<Scene>,
    by_id: HashMap<String, SceneIndex>,
    // link_targets[scene][link] -> target scene
    link_targets: Vec<Vec<SceneIndex>>,
}

/// Parses and validates a JSON tour document.
pub fn load_tour(source: &str) -> Result<Tour, TourError> {
    let document: TourDocument = serde_json::from_str(source)?;
    Tour::from_document(document)
}

/// Parses the viewer's bundled `data.js` form: `var APP_DATA = { ... };`.
pub fn load_tour_script(source: &str) -> Result<Tour, TourError> {
    load_tour(&strip_script_wrapper(source)?)
}

fn strip_script_wrapper(source: &str) -> Result<String, TourError> {
    let start = source
        .find('{')
        .ok_or_else(|| TourError::MalformedGraph("no object literal in script".into()))?;
    let end = source
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| TourError::MalformedGraph("unterminated object literal in script".into()))?;

    let prefix = source[..start].trim();
    if !prefix.is_empty() && !prefix.ends_with('=') {
        return Err(TourError::MalformedGraph(format!(
            "unexpected script prefix '{prefix}'"
        )));
    }

    Ok(normalize_script_whitespace(&source[start..=end]))
}

// Script sources may use whitespace that JSON rejects (e.g. U+00A0).
// Only replace it outside string literals so text content stays untouched.
fn normalize_script_whitespace(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in body.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            c if c.is_whitespace() => out.push(' '),
            c => out.push(c),
        }
    }

    out
}

impl Tour {
    /// Validates a parsed document and builds the lookup tables.
    pub fn from_document(document: TourDocument) -> Result<Self, TourError> {
        let TourDocument {
            scenes,
            name,
            settings,
        } = document;

        if scenes.is_empty() {
            return Err(TourError::EmptyTour);
        }

        let mut by_id = HashMap::with_capacity(scenes.len());
        for (i, scene) in scenes.iter().enumerate() {
            validate_scene(scene)?;
            if by_id.insert(scene.id.clone(), SceneIndex(i)).is_some() {
                return Err(TourError::MalformedGraph(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
        }

        let mut link_targets = Vec::with_capacity(scenes.len());
        for scene in &scenes {
            let targets = scene
                .link_hotspots
                .iter()
                .map(|link| {
                    by_id
                        .get(&link.target)
                        .copied()
                        .ok_or_else(|| TourError::DanglingLink {
                            scene: scene.id.clone(),
                            target: link.target.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            link_targets.push(targets);
        }

        debug!("Loaded tour '{}' with {} scenes", name, scenes.len());

        Ok(Self {
            name,
            settings,
            scenes,
            by_id,
            link_targets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &TourSettings {
        &self.settings
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<SceneIndex> {
        self.by_id.get(id).copied()
    }

    /// Looks a scene up by id.
    pub fn scene(&self, id: &str) -> Result<&Scene, TourError> {
        self.index_of(id)
            .map(|index| &self.scenes[index.0])
            .ok_or_else(|| TourError::NotFound(id.to_owned()))
    }

    pub fn scene_at(&self, index: SceneIndex) -> Option<&Scene> {
        self.scenes.get(index.0)
    }

    /// The scene a viewer starts in: the first one in the document.
    pub fn entry_scene(&self) -> Result<&Scene, TourError> {
        self.scenes.first().ok_or(TourError::EmptyTour)
    }

    /// Resolves link `link_index` of scene `index` to its target.
    pub fn link_target_at(
        &self,
        index: SceneIndex,
        link_index: usize,
    ) -> Result<SceneIndex, TourError> {
        let scene = self
            .scene_at(index)
            .ok_or_else(|| TourError::NotFound(format!("#{}", index.0)))?;
        let targets = &self.link_targets[index.0];

        targets
            .get(link_index)
            .copied()
            .ok_or_else(|| TourError::IndexOutOfRange {
                scene: scene.id.clone(),
                index: link_index,
                count: targets.len(),
            })
    }

    /// Scene reached by following link `link_index` of scene `scene_id`.
    pub fn link_target(&self, scene_id: &str, link_index: usize) -> Result<&Scene, TourError> {
        let from = self
            .index_of(scene_id)
            .ok_or_else(|| TourError::NotFound(scene_id.to_owned()))?;
        let to = self.link_target_at(from, link_index)?;
        Ok(&self.scenes[to.0])
    }

    pub fn to_document(&self) -> TourDocument {
        TourDocument {
            scenes: self.scenes.clone(),
            name: self.name.clone(),
            settings: self.settings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, TourError> {
        serde_json::to_string_pretty(&self.to_document()).map_err(TourError::from)
    }
}

fn malformed(scene: &Scene, what: impl std::fmt::Display) -> TourError {
    TourError::MalformedGraph(format!("scene '{}': {what}", scene.id))
}

fn validate_scene(scene: &Scene) -> Result<(), TourError> {
    if scene.id.is_empty() {
        return Err(TourError::MalformedGraph("scene with empty id".into()));
    }
    if scene.face_size == 0 {
        return Err(malformed(scene, "faceSize must be positive"));
    }

    validate_levels(scene, &scene.levels)?;

    let view = &scene.initial_view_parameters;
    if !view.is_finite() {
        return Err(malformed(scene, "initial view has non-finite angles"));
    }
    if !(view.fov > 0.0 && view.fov < PI) {
        return Err(malformed(scene, format!("fov {} outside (0, PI)", view.fov)));
    }

    for (i, link) in scene.link_hotspots.iter().enumerate() {
        if !(link.yaw.is_finite() && link.pitch.is_finite() && link.rotation.is_finite()) {
            return Err(malformed(scene, format!("link hotspot {i} has non-finite angles")));
        }
    }
    for (i, info) in scene.info_hotspots.iter().enumerate() {
        if !(info.yaw.is_finite() && info.pitch.is_finite()) {
            return Err(malformed(scene, format!("info hotspot {i} has non-finite angles")));
        }
    }

    Ok(())
}

fn validate_levels(scene: &Scene, levels: &[Level]) -> Result<(), TourError> {
    if levels.is_empty() {
        return Err(malformed(scene, "no levels"));
    }

    let mut previous_size = 0;
    for (i, level) in levels.iter().enumerate() {
        if level.tile_size == 0 || level.size == 0 {
            return Err(malformed(scene, format!("level {i} has a zero dimension")));
        }

        // The fallback image is the lowest tier, so there is room for one
        if level.fallback_only && i != 0 {
            return Err(malformed(scene, format!("fallback level {i} is not the first level")));
        }

        if level.size <= previous_size {
            return Err(malformed(
                scene,
                format!("level {i} is not larger than the level before it"),
            ));
        }
        previous_size = level.size;
    }

    if levels.iter().all(|level| level.fallback_only) {
        return Err(malformed(scene, "only fallback levels"));
    }

    Ok(())
}
