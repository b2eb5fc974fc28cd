//! JSON body overlay.

use serde::de::DeserializeOwned;

use crate::error::BindError;

/// Decodes `body` into `slot`.
///
/// An empty (or all-whitespace) body leaves `slot` untouched. A malformed
/// body is a caller fault whose message carries the decoder's description.
///
/// ```
/// use daedalus_bind::json::decode_into;
/// use serde::Deserialize;
///
/// #[derive(Default, Deserialize)]
/// struct Game { players: u32 }
///
/// let mut game = Game::default();
/// decode_into(&mut game, "game", b"").unwrap();
/// assert_eq!(game.players, 0);
///
/// decode_into(&mut game, "game", br#"{"players": 2}"#).unwrap();
/// assert_eq!(game.players, 2);
/// ```
pub fn decode_into<T: DeserializeOwned>(
    slot: &mut T,
    field: &'static str,
    body: &[u8],
) -> Result<(), BindError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    *slot = serde_json::from_slice(body).map_err(|err| BindError::body_decode(field, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        #[serde(default)]
        player_count: i64,
        #[serde(default, rename = "type")]
        kind: String,
    }

    #[test]
    fn test_empty_body_sets_nothing() {
        let mut record = Record {
            player_count: 3,
            kind: "go".into(),
        };
        decode_into(&mut record, "record", b"  \n").unwrap();
        assert_eq!(record.player_count, 3);
    }

    #[test]
    fn test_decodes_fields() {
        let mut record = Record::default();
        decode_into(&mut record, "record", br#"{"type":"chess","playerCount":2}"#).unwrap();
        assert_eq!(
            record,
            Record {
                player_count: 2,
                kind: "chess".into()
            }
        );
    }

    #[test]
    fn test_malformed_body_is_caller_fault() {
        let mut record = Record::default();
        let err = decode_into(&mut record, "record", b"{not json").unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("failed to decode request body: "));
    }

    #[test]
    fn test_wrong_field_type_is_caller_fault() {
        let mut record = Record::default();
        let err = decode_into(&mut record, "record", br#"{"playerCount":"two"}"#).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::BodyDecode);
    }
}
