//! Forest configuration
//!
//! All tunables are plain named numbers; no file format beyond JSON for
//! persisting them. Persisted in LocalStorage on web, loaded from a file on native.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ForestError;

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// A named root direction reserved for a navigation anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub id: String,
    pub label: String,
    /// Root heading in degrees
    pub angle: f32,
}

impl AnchorSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, angle: f32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            angle,
        }
    }

    /// The five site sections, 72 degrees apart
    pub fn navigation() -> Vec<Self> {
        [
            ("home", "Home"),
            ("work", "Work"),
            ("about", "About"),
            ("experiments", "Experiments"),
            ("contact", "Contact"),
        ]
        .iter()
        .enumerate()
        .map(|(i, (id, label))| Self::new(*id, *label, i as f32 * 72.0))
        .collect()
    }
}

/// How many children each subdivided segment gets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Branching {
    /// Weighted pick of 1, 2 or 3 children
    Random { weights: [u32; 3] },
    /// Fixed child count per parent level; levels past the end get 1
    PerLevel(Vec<u8>),
}

impl Default for Branching {
    fn default() -> Self {
        Branching::Random { weights: [1, 1, 1] }
    }
}

/// Multipliers applied to anchor segments so they stay readable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorTuning {
    pub wind: f32,
    pub spring: f32,
    pub max_bend: f32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    /// Anchor root length range, as multiples of `root_length_max`
    pub length_min: f32,
    pub length_max: f32,
}

impl AnchorTuning {
    /// Multipliers must keep anchor bend and reach positive, forces non-negative
    pub fn validate(&self) -> Result<(), ForestError> {
        if !(self.max_bend > 0.0) {
            return Err(ForestError::invalid(
                "anchor_tuning.max_bend",
                "must be positive",
            ));
        }
        if !(self.pointer_radius > 0.0) {
            return Err(ForestError::invalid(
                "anchor_tuning.pointer_radius",
                "must be positive",
            ));
        }
        if !(self.length_min > 0.0) {
            return Err(ForestError::invalid(
                "anchor_tuning.length_min",
                "must be positive",
            ));
        }
        check_range(
            "anchor_tuning.length",
            self.length_min,
            self.length_max,
        )?;
        for (field, value) in [
            ("anchor_tuning.wind", self.wind),
            ("anchor_tuning.spring", self.spring),
            ("anchor_tuning.pointer_strength", self.pointer_strength),
        ] {
            if !(value >= 0.0) {
                return Err(ForestError::invalid(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

impl Default for AnchorTuning {
    fn default() -> Self {
        Self {
            wind: 0.5,
            spring: 1.5,
            max_bend: 0.5,
            pointer_radius: 0.6,
            pointer_strength: 0.5,
            length_min: 1.5,
            length_max: 2.5,
        }
    }
}

/// Forest parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    // === Generation ===
    pub max_level: u32,
    pub root_count: u32,
    pub root_length_min: f32,
    pub root_length_max: f32,
    pub child_length_ratio_min: f32,
    pub child_length_ratio_max: f32,
    pub branching: Branching,

    // === Physics ===
    pub spring_strength: f32,
    /// Degrees
    pub spring_angle_threshold: f32,
    pub wind_speed: f32,
    pub wind_strength: f32,
    pub wind_jitter_min: f32,
    pub wind_jitter_max: f32,
    pub drag: f32,
    /// Degrees
    pub max_bend: f32,

    // === Pointer ===
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    /// Pointer force scale at the root and at `max_level`
    pub pointer_level_scale: (f32, f32),

    // === Anchors ===
    pub anchors: Vec<AnchorSpec>,
    pub anchor_radius: f32,
    pub anchor_strength: f32,
    pub anchor_level_scale: (f32, f32),
    /// Degrees
    pub anchor_gap: f32,
    pub anchor_item_size: f32,
    pub anchor_tuning: AnchorTuning,

    // === Presentation ===
    pub regenerate_on_click: bool,
    pub show_central_point: bool,
    pub central_point_size: f32,
    pub debug: bool,
    pub theme: Theme,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            root_count: ROOT_COUNT,
            root_length_min: ROOT_LENGTH_MIN,
            root_length_max: ROOT_LENGTH_MAX,
            child_length_ratio_min: CHILD_RATIO_MIN,
            child_length_ratio_max: CHILD_RATIO_MAX,
            branching: Branching::default(),

            spring_strength: SPRING_STRENGTH,
            spring_angle_threshold: SPRING_ANGLE_THRESHOLD,
            wind_speed: WIND_SPEED,
            wind_strength: WIND_STRENGTH,
            wind_jitter_min: WIND_JITTER_MIN,
            wind_jitter_max: WIND_JITTER_MAX,
            drag: DRAG,
            max_bend: MAX_BEND,

            pointer_radius: POINTER_RADIUS,
            pointer_strength: POINTER_STRENGTH,
            pointer_level_scale: (1.0, 0.2),

            anchors: Vec::new(),
            anchor_radius: ANCHOR_RADIUS,
            anchor_strength: ANCHOR_STRENGTH,
            anchor_level_scale: (1.0, 0.3),
            anchor_gap: ANCHOR_GAP,
            anchor_item_size: ANCHOR_ITEM_SIZE,
            anchor_tuning: AnchorTuning::default(),

            regenerate_on_click: true,
            show_central_point: false,
            central_point_size: CENTRAL_POINT_SIZE,
            debug: false,
            theme: Theme::Dark,
        }
    }
}

impl ForestConfig {
    /// Defaults plus the five navigation anchors
    pub fn with_navigation() -> Self {
        Self {
            anchors: AnchorSpec::navigation(),
            ..Self::default()
        }
    }

    /// Check ranges that would break the forest invariants
    pub fn validate(&self) -> Result<(), ForestError> {
        check_range(
            "root_length",
            self.root_length_min,
            self.root_length_max,
        )?;
        if self.root_length_min <= 0.0 {
            return Err(ForestError::invalid("root_length_min", "must be positive"));
        }
        check_range(
            "child_length_ratio",
            self.child_length_ratio_min,
            self.child_length_ratio_max,
        )?;
        // Children must be strictly shorter than their parent
        if self.child_length_ratio_min <= 0.0 || self.child_length_ratio_max >= 1.0 {
            return Err(ForestError::invalid(
                "child_length_ratio",
                format!(
                    "[{}, {}] must lie inside (0, 1)",
                    self.child_length_ratio_min, self.child_length_ratio_max
                ),
            ));
        }
        check_range("wind_jitter", self.wind_jitter_min, self.wind_jitter_max)?;
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(ForestError::invalid("drag", "must be within [0, 1]"));
        }
        if !(self.max_bend > 0.0) {
            return Err(ForestError::invalid("max_bend", "must be positive"));
        }
        if !(self.spring_angle_threshold > 0.0) {
            return Err(ForestError::invalid(
                "spring_angle_threshold",
                "must be positive",
            ));
        }
        if !(self.pointer_radius > 0.0) {
            return Err(ForestError::invalid("pointer_radius", "must be positive"));
        }
        if !(self.anchor_radius > 0.0) {
            return Err(ForestError::invalid("anchor_radius", "must be positive"));
        }
        self.anchor_tuning.validate()?;
        if let Branching::Random { weights } = &self.branching {
            if weights.iter().all(|w| *w == 0) {
                return Err(ForestError::invalid(
                    "branching",
                    "at least one weight must be non-zero",
                ));
            }
            if weights.iter().try_fold(0u32, |total, w| total.checked_add(*w)).is_none() {
                return Err(ForestError::invalid(
                    "branching",
                    "weights must sum to at most u32::MAX",
                ));
            }
        }
        if self.root_count == 0 && self.anchors.is_empty() {
            return Err(ForestError::invalid(
                "root_count",
                "forest needs at least one root or anchor",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ForestError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ForestError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "branch_sway_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded forest config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default forest config");
        Self::with_navigation()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Forest config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), ForestError> {
    if !(min <= max) {
        return Err(ForestError::invalid(
            field,
            format!("min {} exceeds max {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ForestConfig::default().validate().is_ok());
        assert!(ForestConfig::with_navigation().validate().is_ok());
    }

    #[test]
    fn test_navigation_anchor_angles() {
        let anchors = AnchorSpec::navigation();
        let angles: Vec<f32> = anchors.iter().map(|a| a.angle).collect();
        assert_eq!(angles, vec![0.0, 72.0, 144.0, 216.0, 288.0]);
        assert_eq!(anchors[2].id, "about");
    }

    #[test]
    fn test_rejects_ratio_outside_unit_interval() {
        let config = ForestConfig {
            child_length_ratio_max: 1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ForestError::InvalidConfig {
                field: "child_length_ratio",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let config = ForestConfig {
            root_length_min: 120.0,
            root_length_max: 100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_forest() {
        let config = ForestConfig {
            root_count: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ForestConfig {
            root_count: 0,
            ..ForestConfig::with_navigation()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = ForestConfig::from_json(r#"{ "max_level": 2, "theme": "Light" }"#).unwrap();
        assert_eq!(config.max_level, 2);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.root_count, ROOT_COUNT);
        assert!((config.drag - DRAG).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_bad_anchor_tuning() {
        let err = ForestConfig::from_json(r#"{ "anchor_tuning": { "max_bend": -1.0 } }"#);
        assert!(matches!(
            err,
            Err(ForestError::InvalidConfig {
                field: "anchor_tuning.max_bend",
                ..
            })
        ));

        let cases = [
            AnchorTuning {
                pointer_radius: 0.0,
                ..Default::default()
            },
            AnchorTuning {
                length_min: 0.0,
                ..Default::default()
            },
            AnchorTuning {
                length_min: 3.0,
                length_max: 2.0,
                ..Default::default()
            },
            AnchorTuning {
                wind: -0.5,
                ..Default::default()
            },
            AnchorTuning {
                spring: f32::NAN,
                ..Default::default()
            },
            AnchorTuning {
                pointer_strength: -1.0,
                ..Default::default()
            },
        ];
        for tuning in cases {
            let config = ForestConfig {
                anchor_tuning: tuning,
                ..ForestConfig::with_navigation()
            };
            assert!(config.validate().is_err(), "{:?} accepted", tuning);
        }

        let calm = ForestConfig {
            anchor_tuning: AnchorTuning {
                wind: 0.0,
                ..Default::default()
            },
            ..ForestConfig::with_navigation()
        };
        assert!(calm.validate().is_ok());
    }

    #[test]
    fn test_rejects_overflowing_weights() {
        let err = ForestConfig::from_json(
            r#"{ "branching": { "Random": { "weights": [4294967295, 1, 0] } } }"#,
        );
        assert!(matches!(
            err,
            Err(ForestError::InvalidConfig {
                field: "branching",
                ..
            })
        ));
        assert!(
            ForestConfig::from_json(
                r#"{ "branching": { "Random": { "weights": [4294967294, 1, 0] } } }"#
            )
            .is_ok()
        );
    }

    #[test]
    fn test_rejects_nan_bend() {
        let config = ForestConfig {
            max_bend: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_per_level_branching() {
        let config = ForestConfig::from_json(r#"{ "branching": { "PerLevel": [2, 1] } }"#).unwrap();
        assert_eq!(config.branching, Branching::PerLevel(vec![2, 1]));
    }

    #[test]
    fn test_json_invalid_is_error() {
        assert!(matches!(
            ForestConfig::from_json("{ not json"),
            Err(ForestError::Json(_))
        ));
        assert!(matches!(
            ForestConfig::from_json(r#"{ "drag": 1.5 }"#),
            Err(ForestError::InvalidConfig { field: "drag", .. })
        ));
    }

    #[test]
    fn test_theme_round_trip_names() {
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
        assert_eq!(Theme::from_str("sepia"), None);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.as_str(), "Light");
    }
}
