//! Macaroon bearer capabilities
//!
//! Implements the binary V2 macaroon format and first-party attenuation.
//! A macaroon's signature is an HMAC-SHA256 chain: every appended caveat
//! re-keys the signature with the previous one, so a holder can narrow a
//! macaroon without knowing the issuer's root key, but cannot widen it.
//!
//! # Security
//!
//! The signature is the bearer secret. It is stored using the `secrecy`
//! crate, zeroized on drop and redacted from `Debug` output.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::Sha256;
use std::fmt;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Version byte that starts every binary V2 macaroon
const MACAROON_V2: u8 = 2;

const FIELD_EOS: u8 = 0;
const FIELD_LOCATION: u8 = 1;
const FIELD_IDENTIFIER: u8 = 2;
const FIELD_VERIFICATION_ID: u8 = 4;
const FIELD_SIGNATURE: u8 = 6;

/// Length of a macaroon signature (SHA-256 output)
pub const SIGNATURE_LEN: usize = 32;

/// Key used to derive fixed-size signing keys from root keys (libmacaroons)
const KEY_GENERATOR: &[u8] = b"macaroons-key-generator";

/// A caveat restricting what a macaroon authorizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caveat {
    /// Caveat identifier; for first-party caveats this is the condition text
    pub id: Vec<u8>,
    /// Location hint of the discharging service (third-party caveats)
    pub location: Option<String>,
    /// Encrypted verification key (third-party caveats only)
    pub verification_id: Option<Vec<u8>>,
}

impl Caveat {
    /// Create a first-party caveat with the given condition
    pub fn first_party(condition: impl Into<Vec<u8>>) -> Self {
        Self {
            id: condition.into(),
            location: None,
            verification_id: None,
        }
    }

    /// Check if this caveat is checked by the target service itself
    pub fn is_first_party(&self) -> bool {
        self.verification_id.is_none()
    }

    /// Condition text of the caveat, if it is valid UTF-8
    pub fn condition(&self) -> Option<&str> {
        std::str::from_utf8(&self.id).ok()
    }
}

/// Binary V2 macaroon
pub struct Macaroon {
    location: Option<String>,
    identifier: Vec<u8>,
    caveats: Vec<Caveat>,
    signature: SecretBox<[u8; SIGNATURE_LEN]>,
}

impl Macaroon {
    /// Mint a new macaroon from a root key
    ///
    /// The root key is first stretched into a signing key the same way
    /// libmacaroons does, so tokens minted here verify against other
    /// implementations sharing the root key.
    pub fn new(
        root_key: &[u8],
        identifier: impl Into<Vec<u8>>,
        location: Option<&str>,
    ) -> AuthResult<Self> {
        let identifier = identifier.into();
        let signature = derive_root_signature(root_key, &identifier)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))?;

        Ok(Self {
            location: location.filter(|l| !l.is_empty()).map(str::to_string),
            identifier,
            caveats: Vec::new(),
            signature: SecretBox::new(Box::new(signature)),
        })
    }

    /// Decode a macaroon from its text form
    ///
    /// Hex is tried first, then URL-safe and standard base64 with or
    /// without padding.
    pub fn decode(text: &str) -> AuthResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AuthError::InvalidCredential("empty macaroon".to_string()));
        }

        let bytes = match hex::decode(text) {
            Ok(bytes) => bytes,
            Err(hex_err) => decode_base64(text).ok_or_else(|| {
                AuthError::InvalidCredential(format!(
                    "macaroon is neither hex nor base64: {}",
                    hex_err
                ))
            })?,
        };

        Self::from_binary(&bytes)
    }

    /// Decode a binary V2 macaroon
    pub fn from_binary(bytes: &[u8]) -> AuthResult<Self> {
        let (&version, rest) = bytes
            .split_first()
            .ok_or_else(|| invalid("empty macaroon"))?;
        if version != MACAROON_V2 {
            return Err(invalid(format!("unsupported macaroon version {}", version)));
        }

        let mut decoder = Decoder { buf: rest };

        // Header: [location] identifier EOS
        let mut packet = decoder.read_packet()?;
        let location = if packet.field == FIELD_LOCATION {
            let location = utf8(packet.data)?;
            packet = decoder.read_packet()?;
            Some(location).filter(|l| !l.is_empty())
        } else {
            None
        };
        if packet.field != FIELD_IDENTIFIER {
            return Err(invalid("missing macaroon identifier"));
        }
        let identifier = packet.data.to_vec();
        decoder.expect_eos("macaroon header")?;

        // Caveats: ([location] identifier [verification-id] EOS)* EOS
        let mut caveats = Vec::new();
        loop {
            let mut packet = decoder.read_packet()?;
            if packet.field == FIELD_EOS {
                break;
            }

            let location = if packet.field == FIELD_LOCATION {
                let location = utf8(packet.data)?;
                packet = decoder.read_packet()?;
                Some(location).filter(|l| !l.is_empty())
            } else {
                None
            };
            if packet.field != FIELD_IDENTIFIER {
                return Err(invalid("caveat without identifier"));
            }
            let id = packet.data.to_vec();

            let mut packet = decoder.read_packet()?;
            let verification_id = if packet.field == FIELD_VERIFICATION_ID {
                let vid = packet.data.to_vec();
                packet = decoder.read_packet()?;
                Some(vid)
            } else {
                None
            };
            if packet.field != FIELD_EOS {
                return Err(invalid(format!(
                    "unexpected field {} in caveat",
                    packet.field
                )));
            }

            caveats.push(Caveat {
                id,
                location,
                verification_id,
            });
        }

        let packet = decoder.read_packet()?;
        if packet.field != FIELD_SIGNATURE {
            return Err(invalid("missing macaroon signature"));
        }
        let signature: [u8; SIGNATURE_LEN] = packet.data.try_into().map_err(|_| {
            invalid(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LEN,
                packet.data.len()
            ))
        })?;

        if !decoder.buf.is_empty() {
            return Err(invalid("unexpected data after macaroon"));
        }

        Ok(Self {
            location,
            identifier,
            caveats,
            signature: SecretBox::new(Box::new(signature)),
        })
    }

    /// Encode to the binary V2 format
    pub fn to_binary(&self) -> Vec<u8> {
        let mut buf = vec![MACAROON_V2];

        if let Some(location) = &self.location {
            put_packet(&mut buf, FIELD_LOCATION, location.as_bytes());
        }
        put_packet(&mut buf, FIELD_IDENTIFIER, &self.identifier);
        buf.push(FIELD_EOS);

        for caveat in &self.caveats {
            if let Some(location) = &caveat.location {
                put_packet(&mut buf, FIELD_LOCATION, location.as_bytes());
            }
            put_packet(&mut buf, FIELD_IDENTIFIER, &caveat.id);
            if let Some(vid) = &caveat.verification_id {
                put_packet(&mut buf, FIELD_VERIFICATION_ID, vid);
            }
            buf.push(FIELD_EOS);
        }
        buf.push(FIELD_EOS);

        put_packet(&mut buf, FIELD_SIGNATURE, self.signature.expose_secret());
        buf
    }

    /// Encode to hex, the form the exchange issues and accepts
    pub fn encode_hex(&self) -> String {
        hex::encode(self.to_binary())
    }

    /// Encode to unpadded URL-safe base64
    pub fn encode_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_binary())
    }

    /// Append a first-party caveat, re-keying the signature
    pub fn add_first_party_caveat(&mut self, condition: impl Into<Vec<u8>>) -> AuthResult<()> {
        let caveat = Caveat::first_party(condition);
        let signature = keyed_hash(self.signature.expose_secret(), &caveat.id)
            .map_err(|e| AuthError::Derivation(e.to_string()))?;

        self.signature = SecretBox::new(Box::new(signature));
        self.caveats.push(caveat);
        Ok(())
    }

    /// Check that the signature chain was produced from `root_key`
    ///
    /// Only first-party caveats can be checked without discharges; a
    /// macaroon carrying third-party caveats never verifies here.
    pub fn verify_signature(&self, root_key: &[u8]) -> bool {
        let Ok(mut expected) = derive_root_signature(root_key, &self.identifier) else {
            return false;
        };

        for caveat in &self.caveats {
            if !caveat.is_first_party() {
                return false;
            }
            match keyed_hash(&expected, &caveat.id) {
                Ok(next) => expected = next,
                Err(_) => return false,
            }
        }

        // Constant-time comparison
        self.signature
            .expose_secret()
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Location hint of the target service
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }

    /// Conditions of all first-party caveats that are valid UTF-8
    pub fn first_party_conditions(&self) -> impl Iterator<Item = &str> {
        self.caveats
            .iter()
            .filter(|c| c.is_first_party())
            .filter_map(Caveat::condition)
    }
}

impl Clone for Macaroon {
    /// Clone the macaroon (creates new SecretBox with the same signature)
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            identifier: self.identifier.clone(),
            caveats: self.caveats.clone(),
            signature: SecretBox::new(Box::new(*self.signature.expose_secret())),
        }
    }
}

impl fmt::Debug for Macaroon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macaroon")
            .field("location", &self.location)
            .field("identifier", &hex::encode(&self.identifier))
            .field("caveats", &self.caveats.len())
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

fn invalid(msg: impl Into<String>) -> AuthError {
    AuthError::InvalidCredential(msg.into())
}

fn utf8(data: &[u8]) -> AuthResult<String> {
    String::from_utf8(data.to_vec()).map_err(|_| invalid("location is not valid UTF-8"))
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    [URL_SAFE_NO_PAD, URL_SAFE, STANDARD, STANDARD_NO_PAD]
        .iter()
        .find_map(|engine| engine.decode(text).ok())
}

/// HMAC-SHA256 of `data` keyed with `key`
fn keyed_hash(key: &[u8], data: &[u8]) -> Result<[u8; SIGNATURE_LEN], hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);

    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn derive_root_signature(
    root_key: &[u8],
    identifier: &[u8],
) -> Result<[u8; SIGNATURE_LEN], hmac::digest::InvalidLength> {
    let signing_key = keyed_hash(KEY_GENERATOR, root_key)?;
    keyed_hash(&signing_key, identifier)
}

fn put_uvarint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

fn put_packet(buf: &mut Vec<u8>, field: u8, data: &[u8]) {
    buf.push(field);
    put_uvarint(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

/// A decoded `(field type, payload)` pair
struct Packet<'a> {
    field: u8,
    data: &'a [u8],
}

struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    fn read_uvarint(&mut self) -> AuthResult<u64> {
        let buf = self.buf;
        let mut value = 0u64;
        for (i, &byte) in buf.iter().enumerate().take(10) {
            // The tenth byte may only carry the top bit of a u64
            if i == 9 && byte > 1 {
                return Err(invalid("varint overflows u64"));
            }
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                self.buf = &buf[i + 1..];
                return Ok(value);
            }
        }
        Err(invalid("truncated varint"))
    }

    fn read_packet(&mut self) -> AuthResult<Packet<'a>> {
        let field = self.read_uvarint()?;
        let field = u8::try_from(field).map_err(|_| invalid(format!("unknown field {}", field)))?;
        if field == FIELD_EOS {
            return Ok(Packet { field, data: &[] });
        }

        let len = self.read_uvarint()?;
        let buf = self.buf;
        let len = usize::try_from(len)
            .ok()
            .filter(|&len| len <= buf.len())
            .ok_or_else(|| invalid("packet length exceeds macaroon size"))?;

        let (data, rest) = buf.split_at(len);
        self.buf = rest;
        Ok(Packet { field, data })
    }

    fn expect_eos(&mut self, section: &str) -> AuthResult<()> {
        let packet = self.read_packet()?;
        if packet.field != FIELD_EOS {
            return Err(invalid(format!(
                "unexpected field {} in {}",
                packet.field, section
            )));
        }
        Ok(())
    }
}
