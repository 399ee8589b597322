use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);
    };
}

id_newtype!(ElementId);
id_newtype!(ObjectId);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned box in page coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the two boxes share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleProperty {
    Opacity,
    TranslateX,
    TranslateY,
    Scale,
}

/// Values for a subset of the animatable visual properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleDelta(BTreeMap<StyleProperty, f32>);

impl StyleDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: StyleProperty, value: f32) -> Self {
        self.0.insert(property, value);
        self
    }

    pub fn get(&self, property: StyleProperty) -> Option<f32> {
        self.0.get(&property).copied()
    }

    pub fn properties(&self) -> impl Iterator<Item = StyleProperty> + '_ {
        self.0.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = (StyleProperty, f32)> + '_ {
        self.0.iter().map(|(property, value)| (*property, *value))
    }

    pub fn same_properties(&self, other: &StyleDelta) -> bool {
        self.0.len() == other.0.len() && self.0.keys().all(|key| other.0.contains_key(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpolates every property present in `from`; `t` may overshoot `[0, 1]`.
    /// Properties missing from `to` keep their `from` value.
    pub fn lerp(from: &StyleDelta, to: &StyleDelta, t: f32) -> StyleDelta {
        let values = from
            .0
            .iter()
            .map(|(property, start)| {
                let end = to.0.get(property).copied().unwrap_or(*start);
                (*property, start + (end - start) * t)
            })
            .collect();
        StyleDelta(values)
    }
}

/// A scene object whose rendered transform is a function of elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionObject {
    pub id: ObjectId,
    pub base_position: Vec3,
    pub amplitude: f32,
    pub frequency: f32,
    /// Radians per second around each axis.
    pub angular_speed: Vec3,
    pub phase_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    pub id: ObjectId,
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Subject,
        FormField::Message,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Subject => "subject",
            FormField::Message => "message",
        }
    }
}
