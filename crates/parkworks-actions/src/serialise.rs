//! Binary wire format for actions.
//!
//! [`DataSerialiser`] is a big-endian stream that either writes fields
//! (saving) or reads them back in place (loading). It implements
//! [`ParameterVisitor`], so an action's wire layout is exactly the order
//! its `accept_parameters` declares.
//!
//! # Command envelope
//!
//! Commands sent between peers and stored in replay logs are framed as:
//!
//! ```text
//! action type id (u32) | command flags (u32) | player id (u32) | parameters
//! ```
//!
//! [`encode_command`] and [`decode_command`] build and parse this frame.

use tracing::debug;

use parkworks_types::GameCommandFlags;

use crate::action::GameAction;
use crate::error::ActionError;
use crate::registry::GameActionType;
use crate::visitor::ParameterVisitor;

/// Whether a [`DataSerialiser`] writes or reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Saving,
    Loading,
}

/// Big-endian field stream.
///
/// While loading, a read past the end of the buffer latches
/// [`ActionError::Truncated`] and leaves the field untouched; every later
/// read is skipped. The latched error is reported by
/// [`DataSerialiser::finish_loading`].
#[derive(Debug)]
pub struct DataSerialiser {
    mode: Mode,
    buffer: Vec<u8>,
    cursor: usize,
    error: Option<ActionError>,
}

impl DataSerialiser {
    /// Create a stream that writes fields.
    pub const fn saving() -> Self {
        Self {
            mode: Mode::Saving,
            buffer: Vec::new(),
            cursor: 0,
            error: None,
        }
    }

    /// Create a stream that reads fields from `bytes`.
    pub fn loading(bytes: &[u8]) -> Self {
        Self {
            mode: Mode::Loading,
            buffer: bytes.to_vec(),
            cursor: 0,
            error: None,
        }
    }

    /// Whether this stream writes fields.
    pub const fn is_saving(&self) -> bool {
        matches!(self.mode, Mode::Saving)
    }

    /// Bytes not yet read.
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    /// The first error seen so far, if any.
    pub const fn error(&self) -> Option<&ActionError> {
        self.error.as_ref()
    }

    /// Return the written bytes.
    ///
    /// # Errors
    ///
    /// Returns the latched error if a string field could not be written.
    pub fn finish_saving(self) -> Result<Vec<u8>, ActionError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.buffer),
        }
    }

    /// Check that every byte was consumed without error.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Truncated`] if a read ran off the end, or
    /// [`ActionError::TrailingBytes`] if input is left over.
    pub fn finish_loading(self) -> Result<(), ActionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match self.remaining() {
            0 => Ok(()),
            extra => Err(ActionError::TrailingBytes(extra)),
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    fn read_bytes(&mut self, count: usize) -> Option<&[u8]> {
        if self.error.is_some() {
            return None;
        }
        let remaining = self.remaining();
        let Some(end) = self.cursor.checked_add(count).filter(|_| count <= remaining) else {
            self.error = Some(ActionError::Truncated {
                needed: count,
                remaining,
            });
            return None;
        };
        let start = self.cursor;
        self.cursor = end;
        self.buffer.get(start..end)
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.read_bytes(N)
            .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
    }
}

macro_rules! stream_integer {
    ($method:ident, $ty:ty) => {
        fn $method(&mut self, _name: &'static str, value: &mut $ty) {
            match self.mode {
                Mode::Saving => self.write(&value.to_be_bytes()),
                Mode::Loading => {
                    if let Some(bytes) = self.read_array() {
                        *value = <$ty>::from_be_bytes(bytes);
                    }
                }
            }
        }
    };
}

impl ParameterVisitor for DataSerialiser {
    stream_integer!(visit_i32, i32);
    stream_integer!(visit_u8, u8);
    stream_integer!(visit_u16, u16);
    stream_integer!(visit_u32, u32);

    fn visit_bool(&mut self, name: &'static str, value: &mut bool) {
        let mut byte = u8::from(*value);
        self.visit_u8(name, &mut byte);
        *value = byte != 0;
    }

    /// Strings travel as a `u16` byte length followed by UTF-8 bytes.
    fn visit_string(&mut self, name: &'static str, value: &mut String) {
        match self.mode {
            Mode::Saving => {
                let Ok(mut length) = u16::try_from(value.len()) else {
                    if self.error.is_none() {
                        self.error = Some(ActionError::StringTooLong {
                            name: name.to_owned(),
                            length: value.len(),
                        });
                    }
                    return;
                };
                self.visit_u16(name, &mut length);
                self.write(value.as_bytes());
            }
            Mode::Loading => {
                let mut length = 0_u16;
                self.visit_u16(name, &mut length);
                let Some(bytes) = self.read_bytes(usize::from(length)) else {
                    return;
                };
                match String::from_utf8(bytes.to_vec()) {
                    Ok(text) => *value = text,
                    Err(_) => self.error = Some(ActionError::InvalidUtf8(name.to_owned())),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Command envelope
// ---------------------------------------------------------------------------

/// A decoded command: the action plus the flags and player it was sent with.
#[derive(Debug)]
pub struct CommandEnvelope {
    /// The action, with its parameters restored.
    pub action: Box<dyn GameAction>,
    /// Command flags the sender attached.
    pub flags: GameCommandFlags,
    /// Player that issued the command.
    pub player_id: u32,
}

/// Encode an action and its invocation context into a command frame.
///
/// # Errors
///
/// Returns an [`ActionError`] if a field cannot be represented on the wire.
pub fn encode_command(
    action: &mut dyn GameAction,
    flags: GameCommandFlags,
    player_id: u32,
) -> Result<Vec<u8>, ActionError> {
    let mut stream = DataSerialiser::saving();
    let mut type_id = action.action_type().id();
    let mut flag_bits = flags.bits();
    let mut player = player_id;
    stream.visit_u32("type", &mut type_id);
    stream.visit_u32("flags", &mut flag_bits);
    stream.visit_u32("player", &mut player);
    action.serialise(&mut stream);
    let bytes = stream.finish_saving()?;
    debug!(action = %action.action_type(), bytes = bytes.len(), "command encoded");
    Ok(bytes)
}

/// Decode a command frame.
///
/// # Errors
///
/// Returns [`ActionError::UnknownActionType`] for an unregistered type id,
/// [`ActionError::Truncated`] for short input, or
/// [`ActionError::TrailingBytes`] if input is left over.
pub fn decode_command(bytes: &[u8]) -> Result<CommandEnvelope, ActionError> {
    let mut stream = DataSerialiser::loading(bytes);
    let mut type_id = 0_u32;
    let mut flag_bits = 0_u32;
    let mut player_id = 0_u32;
    stream.visit_u32("type", &mut type_id);
    stream.visit_u32("flags", &mut flag_bits);
    stream.visit_u32("player", &mut player_id);
    if let Some(error) = stream.error() {
        return Err(error.clone());
    }

    let action_type =
        GameActionType::from_id(type_id).ok_or(ActionError::UnknownActionType(type_id))?;
    let mut action = action_type.create_action();
    action.serialise(&mut stream);
    stream.finish_loading()?;

    Ok(CommandEnvelope {
        action,
        flags: GameCommandFlags(flag_bits),
        player_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ClearSceneryAction, LargeSceneryRemoveAction};
    use crate::visitor::describe_action;
    use parkworks_types::{CoordsXYZD, MapRange};

    #[test]
    fn large_scenery_remove_wire_layout() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(32, -32, 16, 1), 2);
        let mut stream = DataSerialiser::saving();
        action.serialise(&mut stream);
        let bytes = stream.finish_saving().unwrap_or_default();
        assert_eq!(
            bytes,
            vec![
                0x00, 0x00, 0x00, 0x20, // x
                0xFF, 0xFF, 0xFF, 0xE0, // y
                0x00, 0x00, 0x00, 0x10, // z
                0x01, // direction
                0x00, 0x02, // tileIndex
            ]
        );
    }

    #[test]
    fn decoded_command_matches_sent_action() {
        let mut sent = LargeSceneryRemoveAction::new(CoordsXYZD::new(96, 64, 48, 3), 1);
        let flags = GameCommandFlags::GHOST | GameCommandFlags::PATH_SCENERY;
        let encoded = encode_command(&mut sent, flags, 7);
        assert!(encoded.is_ok());
        let Ok(bytes) = encoded else { return };

        let decoded = decode_command(&bytes);
        assert!(decoded.is_ok());
        let Ok(mut envelope) = decoded else { return };
        assert_eq!(envelope.flags, flags);
        assert_eq!(envelope.player_id, 7);
        assert_eq!(envelope.action.action_type(), GameActionType::LargeSceneryRemove);
        assert_eq!(
            describe_action(envelope.action.as_mut()),
            describe_action(&mut sent)
        );

        let reencoded = encode_command(envelope.action.as_mut(), flags, 7).unwrap_or_default();
        assert_eq!(reencoded, bytes);
    }

    #[test]
    fn clear_scenery_frame_is_type_then_flags_then_player() {
        let mut action = ClearSceneryAction::new(MapRange::new(0, 0, 64, 64));
        let bytes = encode_command(&mut action, GameCommandFlags::NONE, 1).unwrap_or_default();
        assert_eq!(bytes.len(), 12 + 16);
        assert_eq!(bytes.get(..4), Some(&[0, 0, 0, 2][..]));
        assert_eq!(bytes.get(8..12), Some(&[0, 0, 0, 1][..]));
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let bytes = [0, 0, 0, 99, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            decode_command(&bytes),
            Err(ActionError::UnknownActionType(99))
        ));
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(0, 0, 0, 0), 0);
        let bytes = encode_command(&mut action, GameCommandFlags::NONE, 0).unwrap_or_default();
        let short = bytes.get(..bytes.len().saturating_sub(1)).unwrap_or_default();
        assert!(matches!(
            decode_command(short),
            Err(ActionError::Truncated { needed: 2, remaining: 1 })
        ));
        assert!(matches!(
            decode_command(&[0, 0]),
            Err(ActionError::Truncated { needed: 4, remaining: 2 })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut action = LargeSceneryRemoveAction::new(CoordsXYZD::new(0, 0, 0, 0), 0);
        let mut bytes = encode_command(&mut action, GameCommandFlags::NONE, 0).unwrap_or_default();
        bytes.push(0xAB);
        assert!(matches!(
            decode_command(&bytes),
            Err(ActionError::TrailingBytes(1))
        ));
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut text = "Fountain".to_owned();
        let mut flag = true;
        let mut saving = DataSerialiser::saving();
        saving.visit_string("text", &mut text);
        saving.visit_bool("flag", &mut flag);
        let bytes = saving.finish_saving().unwrap_or_default();
        assert_eq!(bytes.get(..2), Some(&[0, 8][..]));
        assert_eq!(bytes.len(), 2 + 8 + 1);

        let mut loading = DataSerialiser::loading(&bytes);
        let mut restored = String::new();
        let mut restored_flag = false;
        loading.visit_string("text", &mut restored);
        loading.visit_bool("flag", &mut restored_flag);
        assert!(loading.finish_loading().is_ok());
        assert_eq!(restored, "Fountain");
        assert!(restored_flag);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut loading = DataSerialiser::loading(&[0, 2, 0xC3, 0x28]);
        let mut text = String::new();
        loading.visit_string("text", &mut text);
        assert!(matches!(
            loading.finish_loading(),
            Err(ActionError::InvalidUtf8(_))
        ));
        assert!(text.is_empty());
    }
}
