//! Named parameter visitation.
//!
//! Every action exposes its fields through
//! [`GameAction::accept_parameters`](crate::GameAction::accept_parameters)
//! in one fixed order. The same walk drives three consumers:
//!
//! - [`ParameterExporter`] reads the fields into a [`ParameterMap`] for
//!   logging and introspection.
//! - [`ParameterImporter`] writes named script arguments into a
//!   default-constructed action.
//! - [`DataSerialiser`](crate::DataSerialiser) streams the fields to or
//!   from the binary wire format.
//!
//! Because all three share the walk, the declared field order is also the
//! wire order.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use parkworks_types::{CoordsXYZD, MapRange};

use crate::action::GameAction;
use crate::error::ActionError;
use crate::registry::GameActionType;

/// Receiver for an action's named fields.
///
/// Fields are passed by mutable reference so a visitor may either read or
/// overwrite them.
pub trait ParameterVisitor {
    /// Visit a signed 32-bit field.
    fn visit_i32(&mut self, name: &'static str, value: &mut i32);
    /// Visit an unsigned 8-bit field.
    fn visit_u8(&mut self, name: &'static str, value: &mut u8);
    /// Visit an unsigned 16-bit field.
    fn visit_u16(&mut self, name: &'static str, value: &mut u16);
    /// Visit an unsigned 32-bit field.
    fn visit_u32(&mut self, name: &'static str, value: &mut u32);
    /// Visit a boolean field.
    fn visit_bool(&mut self, name: &'static str, value: &mut bool);
    /// Visit a text field.
    fn visit_string(&mut self, name: &'static str, value: &mut String);

    /// Visit a directed location as `x`, `y`, `z`, `direction`.
    fn visit_coords_xyzd(&mut self, value: &mut CoordsXYZD) {
        self.visit_i32("x", &mut value.x);
        self.visit_i32("y", &mut value.y);
        self.visit_i32("z", &mut value.z);
        self.visit_u8("direction", &mut value.direction);
    }

    /// Visit a rectangle as `left`, `top`, `right`, `bottom`.
    fn visit_map_range(&mut self, value: &mut MapRange) {
        self.visit_i32("left", &mut value.left);
        self.visit_i32("top", &mut value.top);
        self.visit_i32("right", &mut value.right);
        self.visit_i32("bottom", &mut value.bottom);
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// A single exported field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Signed integer field.
    I32(i32),
    /// Byte field.
    U8(u8),
    /// 16-bit field.
    U16(u16),
    /// 32-bit field.
    U32(u32),
    /// Boolean field.
    Bool(bool),
    /// Text field.
    String(String),
}

impl core::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I32(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// An action's fields in declaration order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterMap {
    entries: Vec<(&'static str, ParameterValue)>,
}

impl ParameterMap {
    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    /// Iterate over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParameterValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// Number of fields.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the action has no fields.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Collects an action's fields into a [`ParameterMap`].
#[derive(Debug, Default)]
pub struct ParameterExporter {
    map: ParameterMap,
}

impl ParameterExporter {
    /// Create an empty exporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected fields.
    pub fn finish(self) -> ParameterMap {
        self.map
    }

    fn push(&mut self, name: &'static str, value: ParameterValue) {
        self.map.entries.push((name, value));
    }
}

impl ParameterVisitor for ParameterExporter {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32) {
        self.push(name, ParameterValue::I32(*value));
    }

    fn visit_u8(&mut self, name: &'static str, value: &mut u8) {
        self.push(name, ParameterValue::U8(*value));
    }

    fn visit_u16(&mut self, name: &'static str, value: &mut u16) {
        self.push(name, ParameterValue::U16(*value));
    }

    fn visit_u32(&mut self, name: &'static str, value: &mut u32) {
        self.push(name, ParameterValue::U32(*value));
    }

    fn visit_bool(&mut self, name: &'static str, value: &mut bool) {
        self.push(name, ParameterValue::Bool(*value));
    }

    fn visit_string(&mut self, name: &'static str, value: &mut String) {
        self.push(name, ParameterValue::String(value.clone()));
    }
}

/// Export an action's fields.
pub fn export_parameters(action: &mut dyn GameAction) -> ParameterMap {
    let mut exporter = ParameterExporter::new();
    action.accept_parameters(&mut exporter);
    exporter.finish()
}

/// Render an action for logs, e.g.
/// `LargeSceneryRemove { x: 32, y: 32, z: 16, direction: 0, tileIndex: 1 }`.
pub fn describe_action(action: &mut dyn GameAction) -> String {
    let name = action.action_type().display_name();
    let parameters = export_parameters(action);
    if parameters.is_empty() {
        return name.to_owned();
    }
    let fields: Vec<String> = parameters
        .iter()
        .map(|(field, value)| format!("{field}: {value}"))
        .collect();
    format!("{name} {{ {} }}", fields.join(", "))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Named arguments as supplied by a script or the CLI.
pub type ParameterArgs = BTreeMap<String, serde_json::Value>;

/// Writes named arguments into an action's fields.
///
/// The first problem encountered is latched and reported by
/// [`ParameterImporter::finish`]; later fields are left at their defaults.
#[derive(Debug)]
pub struct ParameterImporter<'a> {
    action: GameActionType,
    args: &'a ParameterArgs,
    visited: BTreeSet<&'static str>,
    error: Option<ActionError>,
}

impl<'a> ParameterImporter<'a> {
    /// Create an importer for one action type.
    pub const fn new(action: GameActionType, args: &'a ParameterArgs) -> Self {
        Self {
            action,
            args,
            visited: BTreeSet::new(),
            error: None,
        }
    }

    /// Report the first problem, or an argument no field consumed.
    ///
    /// # Errors
    ///
    /// Returns the latched [`ActionError`] or
    /// [`ActionError::UnexpectedParameter`].
    pub fn finish(self) -> Result<(), ActionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(extra) = self
            .args
            .keys()
            .find(|name| !self.visited.contains(name.as_str()))
        {
            return Err(ActionError::UnexpectedParameter {
                action: self.action,
                name: extra.clone(),
            });
        }
        Ok(())
    }

    fn lookup(&mut self, name: &'static str) -> Option<&'a serde_json::Value> {
        self.visited.insert(name);
        if self.error.is_some() {
            return None;
        }
        let value = self.args.get(name);
        if value.is_none() {
            self.error = Some(ActionError::MissingParameter {
                action: self.action,
                name: name.to_owned(),
            });
        }
        value
    }

    fn integer<T: TryFrom<i64>>(&mut self, name: &'static str, expected: &'static str) -> Option<T> {
        let raw = self.lookup(name)?;
        let converted = raw.as_i64().and_then(|n| T::try_from(n).ok());
        if converted.is_none() {
            self.error = Some(ActionError::InvalidParameter {
                name: name.to_owned(),
                expected,
            });
        }
        converted
    }
}

impl ParameterVisitor for ParameterImporter<'_> {
    fn visit_i32(&mut self, name: &'static str, value: &mut i32) {
        if let Some(v) = self.integer(name, "a 32-bit signed integer") {
            *value = v;
        }
    }

    fn visit_u8(&mut self, name: &'static str, value: &mut u8) {
        if let Some(v) = self.integer(name, "an integer in 0..=255") {
            *value = v;
        }
    }

    fn visit_u16(&mut self, name: &'static str, value: &mut u16) {
        if let Some(v) = self.integer(name, "an integer in 0..=65535") {
            *value = v;
        }
    }

    fn visit_u32(&mut self, name: &'static str, value: &mut u32) {
        if let Some(v) = self.integer(name, "a 32-bit unsigned integer") {
            *value = v;
        }
    }

    fn visit_bool(&mut self, name: &'static str, value: &mut bool) {
        let Some(raw) = self.lookup(name) else { return };
        match raw.as_bool() {
            Some(v) => *value = v,
            None => {
                self.error = Some(ActionError::InvalidParameter {
                    name: name.to_owned(),
                    expected: "a boolean",
                });
            }
        }
    }

    fn visit_string(&mut self, name: &'static str, value: &mut String) {
        let Some(raw) = self.lookup(name) else { return };
        match raw.as_str() {
            Some(v) => v.clone_into(value),
            None => {
                self.error = Some(ActionError::InvalidParameter {
                    name: name.to_owned(),
                    expected: "a string",
                });
            }
        }
    }
}

/// Build an action of the given type from named arguments.
///
/// # Errors
///
/// Returns an [`ActionError`] if an argument is missing, mistyped, out of
/// range, or not declared by the action.
pub fn import_action(
    action_type: GameActionType,
    args: &ParameterArgs,
) -> Result<Box<dyn GameAction>, ActionError> {
    let mut action = action_type.create_action();
    let mut importer = ParameterImporter::new(action_type, args);
    action.accept_parameters(&mut importer);
    importer.finish()?;
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ClearSceneryAction, LargeSceneryRemoveAction};

    fn args(pairs: &[(&str, serde_json::Value)]) -> ParameterArgs {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect()
    }

    #[test]
    fn export_keeps_declaration_order() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(32, 64, 16, 2), 1);
        let map = export_parameters(&mut action);
        assert_eq!(map.names(), vec!["x", "y", "z", "direction", "tileIndex"]);
        assert_eq!(map.get("direction"), Some(&ParameterValue::U8(2)));
        assert_eq!(map.get("tileIndex"), Some(&ParameterValue::U16(1)));
    }

    #[test]
    fn exported_json_preserves_order() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(32, 64, 16, 2), 1);
        let json = serde_json::to_string(&export_parameters(&mut action)).unwrap_or_default();
        assert_eq!(json, r#"{"x":32,"y":64,"z":16,"direction":2,"tileIndex":1}"#);
    }

    #[test]
    fn describe_renders_name_and_fields() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(32, 32, 0, 0), 1);
        assert_eq!(
            describe_action(&mut action),
            "LargeSceneryRemove { x: 32, y: 32, z: 0, direction: 0, tileIndex: 1 }"
        );
    }

    #[test]
    fn describe_separates_fields_and_bare_names() {
        #[derive(Debug)]
        struct Bare;

        impl GameAction for Bare {
            fn action_type(&self) -> GameActionType {
                GameActionType::ClearScenery
            }

            fn accept_parameters(&mut self, _visitor: &mut dyn ParameterVisitor) {}

            fn query(
                &self,
                _world: &parkworks_world::World,
                _ctx: &mut crate::action::ActionContext<'_>,
            ) -> crate::result::GameActionResult {
                crate::result::GameActionResult::new()
            }

            fn execute(
                &self,
                _world: &mut parkworks_world::World,
                _ctx: &mut crate::action::ActionContext<'_>,
            ) -> crate::result::GameActionResult {
                crate::result::GameActionResult::new()
            }
        }

        let mut clear = ClearSceneryAction::new(MapRange::new(0, 32, 64, 96));
        assert_eq!(
            describe_action(&mut clear),
            "ClearScenery { left: 0, top: 32, right: 64, bottom: 96 }"
        );
        assert_eq!(describe_action(&mut Bare), "ClearScenery");
    }

    #[test]
    fn import_fills_every_field() {
        let supplied = args(&[
            ("x", serde_json::json!(64)),
            ("y", serde_json::json!(32)),
            ("z", serde_json::json!(16)),
            ("direction", serde_json::json!(3)),
            ("tileIndex", serde_json::json!(2)),
        ]);
        let imported = import_action(GameActionType::LargeSceneryRemove, &supplied);
        assert!(imported.is_ok());
        let Ok(mut action) = imported else { return };
        assert_eq!(
            describe_action(action.as_mut()),
            "LargeSceneryRemove { x: 64, y: 32, z: 16, direction: 3, tileIndex: 2 }"
        );
    }

    #[test]
    fn import_accepts_yaml_arguments() {
        let yaml = "left: 0\ntop: 32\nright: 96\nbottom: 128\n";
        let supplied: ParameterArgs = serde_yml::from_str(yaml).unwrap();
        let mut action = import_action(GameActionType::ClearScenery, &supplied).unwrap();
        assert_eq!(
            describe_action(action.as_mut()),
            "ClearScenery { left: 0, top: 32, right: 96, bottom: 128 }"
        );
    }

    #[test]
    fn import_reports_missing_argument() {
        let supplied = args(&[("left", serde_json::json!(0)), ("top", serde_json::json!(0))]);
        let imported = import_action(GameActionType::ClearScenery, &supplied);
        assert!(matches!(
            imported,
            Err(ActionError::MissingParameter { ref name, .. }) if name == "right"
        ));
    }

    #[test]
    fn import_rejects_out_of_range_values() {
        let supplied = args(&[
            ("x", serde_json::json!(0)),
            ("y", serde_json::json!(0)),
            ("z", serde_json::json!(0)),
            ("direction", serde_json::json!(300)),
            ("tileIndex", serde_json::json!(0)),
        ]);
        let imported = import_action(GameActionType::LargeSceneryRemove, &supplied);
        assert!(matches!(
            imported,
            Err(ActionError::InvalidParameter { ref name, .. }) if name == "direction"
        ));
    }

    #[test]
    fn import_rejects_undeclared_argument() {
        let supplied = args(&[
            ("left", serde_json::json!(0)),
            ("top", serde_json::json!(0)),
            ("right", serde_json::json!(64)),
            ("bottom", serde_json::json!(64)),
            ("radius", serde_json::json!(3)),
        ]);
        let imported = import_action(GameActionType::ClearScenery, &supplied);
        assert!(matches!(
            imported,
            Err(ActionError::UnexpectedParameter { ref name, .. }) if name == "radius"
        ));
    }

    #[test]
    fn map_range_visits_in_edge_order() {
        let mut action = ClearSceneryAction::default();
        assert_eq!(
            export_parameters(&mut action).names(),
            vec!["left", "top", "right", "bottom"]
        );
    }
}
