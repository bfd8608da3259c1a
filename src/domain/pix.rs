// Static PIX ("Pix Copia e Cola") payload encoding.
//
// The payload is a flat list of EMV tag-length-value fields. Tags 26 and 62 are
// templates whose value is itself an encoded field list. The last field is
// always the CRC (tag 63), computed over everything before its value.

use std::fmt;

// PIX sentinel for "no value" in optional fields.
pub const UNSET: &str = "***";

const PIX_GUI: &str = "br.gov.bcb.pix";
const CRC_PREFIX: &str = "6304";
pub const MAX_VALUE_LEN: usize = 99;

const TAG_PAYLOAD_FORMAT: u8 = 0;
const TAG_MERCHANT_ACCOUNT: u8 = 26;
const TAG_CATEGORY_CODE: u8 = 52;
const TAG_CURRENCY: u8 = 53;
const TAG_AMOUNT: u8 = 54;
const TAG_COUNTRY: u8 = 58;
const TAG_MERCHANT_NAME: u8 = 59;
const TAG_MERCHANT_CITY: u8 = 60;
const TAG_ADDITIONAL_DATA: u8 = 62;

const SUB_GUI: u8 = 0;
const SUB_KEY: u8 = 1;
const SUB_DESCRIPTION: u8 = 2;
const SUB_TRANSACTION_ID: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixError {
    InvalidAmount(String),
    FieldTooLong { tag: u8, len: usize },
    Malformed(&'static str),
}

impl fmt::Display for PixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixError::InvalidAmount(amount) => write!(f, "invalid pix amount: {amount:?}"),
            PixError::FieldTooLong { tag, len } => {
                write!(f, "pix field {tag:02} is {len} bytes, limit is {MAX_VALUE_LEN}")
            }
            PixError::Malformed(reason) => write!(f, "malformed pix payload: {reason}"),
        }
    }
}

impl std::error::Error for PixError {}

/// Inputs for a static PIX payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixRequest {
    pub amount: String,
    pub merchant_name: String,
    pub pix_key: String,
    pub city: String,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
}

impl PixRequest {
    pub fn new(
        amount: impl Into<String>,
        merchant_name: impl Into<String>,
        pix_key: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            merchant_name: merchant_name.into(),
            pix_key: pix_key.into(),
            city: city.into(),
            transaction_id: None,
            description: None,
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

enum FieldValue<'a> {
    Text(&'a str),
    Template(Vec<Field<'a>>),
}

struct Field<'a> {
    tag: u8,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    fn text(tag: u8, value: &'a str) -> Self {
        Self {
            tag,
            value: FieldValue::Text(value),
        }
    }

    fn template(tag: u8, fields: Vec<Field<'a>>) -> Self {
        Self {
            tag,
            value: FieldValue::Template(fields),
        }
    }
}

// Single place where lengths are computed; templates are encoded first so the
// outer length covers the full inner tag-length-value content.
fn encode(fields: &[Field<'_>]) -> Result<String, PixError> {
    let mut out = String::new();
    for field in fields {
        let nested;
        let value = match &field.value {
            FieldValue::Text(text) => *text,
            FieldValue::Template(inner) => {
                nested = encode(inner)?;
                nested.as_str()
            }
        };
        if value.len() > MAX_VALUE_LEN {
            return Err(PixError::FieldTooLong {
                tag: field.tag,
                len: value.len(),
            });
        }
        out.push_str(&format!("{:02}{:02}{}", field.tag, value.len(), value));
    }
    Ok(out)
}

/// Builds the full "copia e cola" string, CRC included.
pub fn generate_pix_payload(request: &PixRequest) -> Result<String, PixError> {
    let amount = normalize_amount(&request.amount)?;

    let mut account = vec![
        Field::text(SUB_GUI, PIX_GUI),
        Field::text(SUB_KEY, &request.pix_key),
    ];
    if let Some(description) = request.description.as_deref().filter(|d| *d != UNSET) {
        account.push(Field::text(SUB_DESCRIPTION, description));
    }
    let transaction_id = request.transaction_id.as_deref().unwrap_or(UNSET);

    let fields = vec![
        Field::text(TAG_PAYLOAD_FORMAT, "01"),
        Field::template(TAG_MERCHANT_ACCOUNT, account),
        Field::text(TAG_CATEGORY_CODE, "0000"),
        Field::text(TAG_CURRENCY, "986"),
        Field::text(TAG_AMOUNT, &amount),
        Field::text(TAG_COUNTRY, "BR"),
        Field::text(TAG_MERCHANT_NAME, &request.merchant_name),
        Field::text(TAG_MERCHANT_CITY, &request.city),
        Field::template(
            TAG_ADDITIONAL_DATA,
            vec![Field::text(SUB_TRANSACTION_ID, transaction_id)],
        ),
    ];

    let mut payload = encode(&fields)?;
    payload.push_str(CRC_PREFIX);
    let crc = crc16_ccitt_false(payload.as_bytes());
    payload.push_str(&format!("{crc:04X}"));
    Ok(payload)
}

// Accepts `digits` or `digits.digits`, with `,` allowed as decimal separator.
fn normalize_amount(raw: &str) -> Result<String, PixError> {
    let amount = raw.replace(',', ".");
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let valid = match amount.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(&amount),
    };
    if !valid {
        return Err(PixError::InvalidAmount(raw.to_string()));
    }
    Ok(amount)
}

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection, no final xor.
pub fn crc16_ccitt_false(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Splits one level of tag-length-value content. Templates can be fed back in.
pub fn decode_fields(payload: &str) -> Result<Vec<(u8, String)>, PixError> {
    let mut fields = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let tag = rest
            .get(..2)
            .and_then(parse_two_digits)
            .ok_or(PixError::Malformed("bad tag"))?;
        let len = rest
            .get(2..4)
            .and_then(parse_two_digits)
            .ok_or(PixError::Malformed("bad length"))?;
        let value = rest
            .get(4..4 + len)
            .ok_or(PixError::Malformed("value shorter than its length prefix"))?;
        fields.push((tag as u8, value.to_string()));
        rest = &rest[4 + len..];
    }
    Ok(fields)
}

fn parse_two_digits(s: &str) -> Option<usize> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// True when the trailing 4 hex chars match the CRC of everything before them.
pub fn verify_checksum(payload: &str) -> bool {
    let Some(split) = payload.len().checked_sub(4) else {
        return false;
    };
    match (payload.get(..split), payload.get(split..)) {
        (Some(body), Some(checksum)) if body.ends_with(CRC_PREFIX) => {
            format!("{:04X}", crc16_ccitt_false(body.as_bytes())) == checksum
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maria() -> PixRequest {
        PixRequest::new("150.00", "Maria Silva", "maria@example.com", "ANANINDEUA")
    }

    fn field(fields: &[(u8, String)], tag: u8) -> &str {
        fields
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
            .expect("expected tag to be present")
    }

    #[test]
    fn crc_matches_the_ccitt_false_check_value() {
        assert_eq!(crc16_ccitt_false(b"123456789"), 0x29B1);
        assert_eq!(crc16_ccitt_false(b""), 0xFFFF);
    }

    #[test]
    fn when_payload_is_generated_then_it_has_the_expected_fixed_fields() {
        let payload = generate_pix_payload(&maria()).expect("expected payload");

        assert!(payload.starts_with("000201"));
        assert!(payload.contains("5406150.00"));
        assert!(payload.contains("5802BR"));
        assert!(payload.contains("52040000"));
        assert!(payload.contains("5303986"));
        assert!(payload.contains("5911Maria Silva"));
        assert!(payload.contains("6010ANANINDEUA"));
        assert!(payload.contains("62070503***"));

        let checksum = &payload[payload.len() - 4..];
        assert!(checksum
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
        let expected = crc16_ccitt_false(payload[..payload.len() - 4].as_bytes());
        assert_eq!(checksum, format!("{expected:04X}"));
        assert!(verify_checksum(&payload));
    }

    #[test]
    fn when_generated_twice_then_output_is_identical() {
        let first = generate_pix_payload(&maria()).unwrap();
        let second = generate_pix_payload(&maria()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn when_payload_is_decoded_then_original_values_are_recovered() {
        let request = maria().with_transaction_id("a1b2c3d4e5f60718");
        let payload = generate_pix_payload(&request).unwrap();

        let fields = decode_fields(&payload).expect("expected valid tlv");
        let tags: Vec<u8> = fields.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![0, 26, 52, 53, 54, 58, 59, 60, 62, 63]);

        assert_eq!(field(&fields, 54), "150.00");
        assert_eq!(field(&fields, 59), "Maria Silva");
        assert_eq!(field(&fields, 60), "ANANINDEUA");

        let account = decode_fields(field(&fields, 26)).unwrap();
        assert_eq!(account[0], (0, "br.gov.bcb.pix".to_string()));
        assert_eq!(account[1], (1, "maria@example.com".to_string()));
        assert_eq!(account.len(), 2);

        let additional = decode_fields(field(&fields, 62)).unwrap();
        assert_eq!(additional, vec![(5, "a1b2c3d4e5f60718".to_string())]);
    }

    #[test]
    fn when_amount_uses_comma_then_it_is_normalized_to_dot() {
        let request = PixRequest::new("10,50", "Maria Silva", "key", "BELEM");
        let payload = generate_pix_payload(&request).unwrap();
        assert!(payload.contains("540510.50"));
        assert!(!payload.contains("10,50"));
    }

    #[test]
    fn when_amount_is_not_a_decimal_then_returns_invalid_amount() {
        for amount in ["", "abc", "-1.00", "1.2.3", "1.", ".5", "1e3", " 10"] {
            let request = PixRequest::new(amount, "Maria", "key", "BELEM");
            assert!(
                matches!(generate_pix_payload(&request), Err(PixError::InvalidAmount(_))),
                "amount {amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn when_merchant_name_exceeds_99_bytes_then_returns_field_too_long() {
        let request = PixRequest::new("1.00", "x".repeat(100), "key", "BELEM");
        assert_eq!(
            generate_pix_payload(&request),
            Err(PixError::FieldTooLong { tag: 59, len: 100 })
        );
    }

    #[test]
    fn when_merchant_name_is_exactly_99_bytes_then_payload_is_valid() {
        let request = PixRequest::new("1.00", "x".repeat(99), "key", "BELEM");
        let payload = generate_pix_payload(&request).unwrap();
        assert!(payload.contains(&format!("5999{}", "x".repeat(99))));
        assert!(verify_checksum(&payload));
    }

    #[test]
    fn when_pix_key_overflows_the_account_template_then_returns_field_too_long() {
        // 18 bytes of GUI sub-field + 4 bytes of key header leave 77 for the key.
        let fits = PixRequest::new("1.00", "Maria", "k".repeat(77), "BELEM");
        assert!(generate_pix_payload(&fits).is_ok());

        let overflow = PixRequest::new("1.00", "Maria", "k".repeat(78), "BELEM");
        assert_eq!(
            generate_pix_payload(&overflow),
            Err(PixError::FieldTooLong { tag: 26, len: 100 })
        );
    }

    #[test]
    fn when_lengths_are_counted_then_bytes_not_chars_are_used() {
        let request = PixRequest::new("1.00", "Maria", "key", "SÃO PAULO");
        let payload = generate_pix_payload(&request).unwrap();
        assert!(payload.contains("6010SÃO PAULO"));
        assert!(verify_checksum(&payload));
    }

    #[test]
    fn when_description_is_set_then_it_lands_in_the_account_template() {
        let request = maria().with_description("Gift for the couple");
        let payload = generate_pix_payload(&request).unwrap();

        let fields = decode_fields(&payload).unwrap();
        let account = decode_fields(field(&fields, 26)).unwrap();
        assert_eq!(account[2], (2, "Gift for the couple".to_string()));
    }

    #[test]
    fn when_description_is_the_unset_sentinel_then_it_is_omitted() {
        let with_sentinel = generate_pix_payload(&maria().with_description(UNSET)).unwrap();
        let without = generate_pix_payload(&maria()).unwrap();
        assert_eq!(with_sentinel, without);
    }

    #[test]
    fn when_a_character_is_altered_then_checksum_no_longer_verifies() {
        let payload = generate_pix_payload(&maria()).unwrap();
        let tampered = payload.replacen("150.00", "950.00", 1);
        assert!(!verify_checksum(&tampered));
        assert!(!verify_checksum("63"));
    }

    #[test]
    fn when_length_prefix_overruns_then_decode_fails() {
        assert_eq!(
            decode_fields("0005ab"),
            Err(PixError::Malformed("value shorter than its length prefix"))
        );
        assert_eq!(decode_fields("0+01a"), Err(PixError::Malformed("bad tag")));
    }
}
