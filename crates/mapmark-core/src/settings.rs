//! Map configuration edited alongside the marker positions.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_IMAGE: &str =
    "https://saraya-al-fursan.darwaemaar.com/images/map/riyadh/map.jpg";

/// Zoom levels accepted by the zoom slider
pub const ZOOM_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapTheme {
    #[default]
    Dark,
    Light,
}

/// Typed map settings record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapSettings {
    pub background_image: String,
    pub theme: MapTheme,
    pub default_zoom: u8,
    pub center_lat: f64,
    pub center_lng: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub show_labels: bool,
    pub enable_animation: bool,
    pub cluster_markers: bool,
    pub lazy_loading: bool,
    pub image_compression: bool,
    pub preload_assets: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            background_image: DEFAULT_BACKGROUND_IMAGE.to_string(),
            theme: MapTheme::Dark,
            default_zoom: 12,
            center_lat: 24.7136,
            center_lng: 46.6753,
            brightness: 0.8,
            contrast: 1.1,
            saturation: 1.0,
            show_labels: true,
            enable_animation: true,
            cluster_markers: false,
            lazy_loading: true,
            image_compression: true,
            preload_assets: false,
        }
    }
}

impl MapSettings {
    /// Apply an update field by field; returns whether anything changed
    pub fn apply(&mut self, update: &MapSettingsUpdate) -> bool {
        let before = self.clone();
        if let Some(ref image) = update.background_image {
            self.background_image.clone_from(image);
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(zoom) = update.default_zoom {
            self.default_zoom = zoom.clamp(*ZOOM_RANGE.start(), *ZOOM_RANGE.end());
        }
        if let Some(lat) = update.center_lat {
            self.center_lat = lat;
        }
        if let Some(lng) = update.center_lng {
            self.center_lng = lng;
        }
        if let Some(v) = update.brightness {
            self.brightness = v;
        }
        if let Some(v) = update.contrast {
            self.contrast = v;
        }
        if let Some(v) = update.saturation {
            self.saturation = v;
        }
        if let Some(v) = update.show_labels {
            self.show_labels = v;
        }
        if let Some(v) = update.enable_animation {
            self.enable_animation = v;
        }
        if let Some(v) = update.cluster_markers {
            self.cluster_markers = v;
        }
        if let Some(v) = update.lazy_loading {
            self.lazy_loading = v;
        }
        if let Some(v) = update.image_compression {
            self.image_compression = v;
        }
        if let Some(v) = update.preload_assets {
            self.preload_assets = v;
        }
        *self != before
    }
}

/// Partial settings change. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapSettingsUpdate {
    pub background_image: Option<String>,
    pub theme: Option<MapTheme>,
    pub default_zoom: Option<u8>,
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub saturation: Option<f64>,
    pub show_labels: Option<bool>,
    pub enable_animation: Option<bool>,
    pub cluster_markers: Option<bool>,
    pub lazy_loading: Option<bool>,
    pub image_compression: Option<bool>,
    pub preload_assets: Option<bool>,
}
