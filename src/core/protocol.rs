//! NMEA 0183 XDR sentence validation and decoding
//!
//! Only XDR (transducer measurement) sentences are recognized. A raw line
//! must pass frame, checksum, and type checks before any field is trusted;
//! everything else is reported as a [`SentenceError`] the caller is
//! expected to drop.

use thiserror::Error;

/// Sentence start marker.
pub const START_MARKER: char = '$';

/// Checksum separator.
pub const CHECKSUM_SEPARATOR: char = '*';

/// Reasons a raw line fails XDR validation.
///
/// All of these are expected noise on a shared serial line, not faults;
/// callers log them at debug verbosity at most.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    /// Line does not begin with `$` (includes the empty line).
    #[error("missing start marker")]
    MissingStart,
    /// No `*` checksum separator present.
    #[error("missing checksum separator")]
    MissingChecksum,
    /// Text after `*` is not a 2-digit hexadecimal number.
    #[error("malformed checksum field")]
    BadChecksumField,
    /// Computed XOR does not match the transmitted checksum.
    #[error("checksum mismatch: expected {expected:02X}, computed {computed:02X}")]
    ChecksumMismatch {
        /// Checksum transmitted after the separator.
        expected: u8,
        /// XOR fold computed over the sentence body.
        computed: u8,
    },
    /// Line too short to carry a sentence type.
    #[error("line too short for a sentence type")]
    TooShort,
    /// Sentence type is not XDR.
    #[error("not an XDR sentence: {found}")]
    NotXdr {
        /// The 3-character type that was found instead.
        found: String,
    },
}

/// XOR fold of `data` bytes, in stream order.
pub fn checksum(data: &str) -> u8 {
    data.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Validates one raw line as a checksummed XDR sentence.
///
/// The checksum covers the bytes strictly between `$` and `*`, both
/// delimiters exclusive. On success the sentence text is returned with
/// the `*CHK` suffix stripped.
pub fn validate_xdr(line: &str) -> Result<&str, SentenceError> {
    if !line.starts_with(START_MARKER) {
        return Err(SentenceError::MissingStart);
    }

    let star = line
        .rfind(CHECKSUM_SEPARATOR)
        .ok_or(SentenceError::MissingChecksum)?;

    let expected = u8::from_str_radix(&line[star + 1..], 16)
        .map_err(|_| SentenceError::BadChecksumField)?;

    let computed = checksum(&line[1..star]);
    if computed != expected {
        return Err(SentenceError::ChecksumMismatch { expected, computed });
    }

    // Sentence type sits after the 2-letter talker ID. The window is
    // taken from the body so it can neither index past a short frame nor
    // slide into the checksum field.
    let body = &line[..star];
    match body.get(3..6) {
        Some("XDR") => Ok(body),
        Some(other) => Err(SentenceError::NotXdr {
            found: other.to_string(),
        }),
        None => Err(SentenceError::TooShort),
    }
}

/// One (type, value, unit, name) group from an XDR sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransducerReading {
    /// Transducer type code (e.g. `C` for a temperature transducer).
    pub transducer_type: String,
    /// Raw measurement text as transmitted.
    pub value: String,
    /// Unit code (e.g. `C`, `F`, `B`).
    pub unit: String,
    /// Transducer name/identifier.
    pub name: String,
}

/// Splits a validated sentence into its transducer readings.
///
/// The leading sentence-type field is discarded and the remaining fields
/// grouped in fours; a trailing partial group is dropped. A sentence may
/// carry zero readings.
pub fn decode_readings(sentence: &str) -> Vec<TransducerReading> {
    let fields: Vec<&str> = sentence.split(',').collect();
    fields[1..]
        .chunks_exact(4)
        .map(|group| TransducerReading {
            transducer_type: group[0].to_string(),
            value: group[1].to_string(),
            unit: group[2].to_string(),
            name: group[3].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(checksum("WIXDR,C,23.4,C,TempAir"), 0x3D);
        assert_eq!(checksum(""), 0x00);
    }

    #[test]
    fn test_valid_sentence_is_stripped() {
        let result = validate_xdr("$WIXDR,C,23.4,C,TempAir*3D");
        assert_eq!(result, Ok("$WIXDR,C,23.4,C,TempAir"));
    }

    #[test]
    fn test_wrong_checksum_digit_rejected() {
        let result = validate_xdr("$WIXDR,C,23.4,C,TempAir*3E");
        assert_eq!(
            result,
            Err(SentenceError::ChecksumMismatch {
                expected: 0x3E,
                computed: 0x3D,
            })
        );
    }

    #[test]
    fn test_single_bit_flip_flips_verdict() {
        let body = "WIXDR,C,23.4,C,TempAir";
        let cs = checksum(body);
        assert!(validate_xdr(&format!("${body}*{cs:02X}")).is_ok());

        // Flip one bit anywhere in the covered span.
        for i in 0..body.len() {
            let mut bytes = body.as_bytes().to_vec();
            bytes[i] ^= 0x04;
            let corrupted = String::from_utf8(bytes).unwrap();
            let line = format!("${corrupted}*{cs:02X}");
            assert!(validate_xdr(&line).is_err(), "bit flip at {i} accepted");
        }
    }

    #[test]
    fn test_missing_start_marker() {
        assert_eq!(validate_xdr(""), Err(SentenceError::MissingStart));
        assert_eq!(validate_xdr("WIXDR,C,1*00"), Err(SentenceError::MissingStart));
        assert_eq!(validate_xdr("garbage"), Err(SentenceError::MissingStart));
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            validate_xdr("$WIXDR,C,23.4,C,TempAir"),
            Err(SentenceError::MissingChecksum)
        );
    }

    #[test]
    fn test_garbage_checksum_field() {
        assert_eq!(
            validate_xdr("$WIXDR,C,23.4,C,TempAir*GZ"),
            Err(SentenceError::BadChecksumField)
        );
        assert_eq!(
            validate_xdr("$WIXDR,C,23.4,C,TempAir*"),
            Err(SentenceError::BadChecksumField)
        );
    }

    #[test]
    fn test_short_line_does_not_index_past_frame() {
        // "AB" XORs to 0x03; the checksum passes but the type field is absent.
        assert_eq!(validate_xdr("$AB*03"), Err(SentenceError::TooShort));
        // One character short of a full type field: the window must not
        // slide into the checksum field.
        assert_eq!(validate_xdr("$ABCD*04"), Err(SentenceError::TooShort));
    }

    #[test]
    fn test_type_window_stops_at_the_separator() {
        // The body carries exactly three type characters; the reported
        // type must come from the body, not the checksum field.
        assert_eq!(
            validate_xdr("$ABCDE*41"),
            Err(SentenceError::NotXdr {
                found: "CDE".to_string(),
            })
        );
    }

    #[test]
    fn test_non_xdr_type_filtered() {
        let line = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,47.0,M,,*4F";
        assert_eq!(
            validate_xdr(line),
            Err(SentenceError::NotXdr {
                found: "GGA".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_single_reading() {
        let readings = decode_readings("$WIXDR,C,23.4,C,TempAir");
        assert_eq!(
            readings,
            vec![TransducerReading {
                transducer_type: "C".to_string(),
                value: "23.4".to_string(),
                unit: "C".to_string(),
                name: "TempAir".to_string(),
            }]
        );
    }

    #[test]
    fn test_decode_multiple_readings() {
        let readings = decode_readings("$WIXDR,C,23.4,C,TempAir,P,1.013,B,Baro");
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].transducer_type, "P");
        assert_eq!(readings[1].unit, "B");
    }

    #[test]
    fn test_trailing_partial_group_dropped() {
        let readings = decode_readings("$WIXDR,C,23.4,C,TempAir,P,1.013");
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].name, "TempAir");
    }

    #[test]
    fn test_empty_fields_are_kept_for_the_consumer() {
        // Filtering empty readings is the enricher's call, not the decoder's.
        let readings = decode_readings("$WIXDR,C,,C,TempAir");
        assert_eq!(readings.len(), 1);
        assert!(readings[0].value.is_empty());
    }

    #[test]
    fn test_sentence_type_only_yields_nothing() {
        assert!(decode_readings("$WIXDR").is_empty());
    }
}
