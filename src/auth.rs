use std::io::Write;

use base64::engine::{general_purpose, Engine};
use chrono::{TimeZone, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use rand::Rng;
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const TC3_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Signing utilities for the Tencent Cloud products
pub struct TencentAuth;

impl TencentAuth {
    /// Generate a random nonce for API requests
    pub fn generate_nonce() -> String {
        rand::thread_rng().gen_range(10000000..99999999).to_string()
    }

    /// Random value for de-duplication fields such as `MsgRandom`
    pub fn random_u32() -> u32 {
        rand::thread_rng().gen()
    }

    /// Get current timestamp for API requests
    pub fn get_timestamp() -> i64 {
        Utc::now().timestamp()
    }

    /// Build the `Authorization` header for a Cloud API 3.0 JSON POST to `/`.
    pub fn tc3_authorization(
        secret_id: &str,
        secret_key: &str,
        service: &str,
        host: &str,
        timestamp: i64,
        payload: &str,
    ) -> String {
        let date = Utc
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "1970-01-01".to_string());

        let signed_headers = "content-type;host";
        let canonical_request = format!(
            "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
            TC3_CONTENT_TYPE,
            host,
            signed_headers,
            sha256_hex(payload.as_bytes())
        );

        let credential_scope = format!("{}/{}/tc3_request", date, service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            TC3_ALGORITHM,
            timestamp,
            credential_scope,
            sha256_hex(canonical_request.as_bytes())
        );

        debug!("TC3 string to sign: {}", string_to_sign);

        let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date.as_bytes());
        let secret_service = hmac_sha256(&secret_date, service.as_bytes());
        let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
        let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

        format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            TC3_ALGORITHM, secret_id, credential_scope, signed_headers, signature
        )
    }

    /// Generate an IM UserSig (TLS signature version 2.0).
    ///
    /// The result is URL-safe: base64 `+`, `/` and `=` become `*`, `-` and `_`.
    pub fn generate_user_sig(
        sdk_app_id: u64,
        key: &str,
        identifier: &str,
        expire: u64,
        current_time: i64,
    ) -> String {
        let content = format!(
            "TLS.identifier:{}\nTLS.sdkappid:{}\nTLS.time:{}\nTLS.expire:{}\n",
            identifier, sdk_app_id, current_time, expire
        );
        let sig = general_purpose::STANDARD.encode(hmac_sha256(key.as_bytes(), content.as_bytes()));

        let document = json!({
            "TLS.ver": "2.0",
            "TLS.identifier": identifier,
            "TLS.sdkappid": sdk_app_id,
            "TLS.expire": expire,
            "TLS.time": current_time,
            "TLS.sig": sig,
        });

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(document.to_string().as_bytes())
            .expect("writing into a Vec cannot fail");
        let compressed = encoder.finish().expect("writing into a Vec cannot fail");

        general_purpose::STANDARD
            .encode(compressed)
            .chars()
            .map(|c| match c {
                '+' => '*',
                '/' => '-',
                '=' => '_',
                other => other,
            })
            .collect()
    }

    /// Live anti-leech secret: lower-case hex MD5 of `key + stream_name + tx_time`.
    pub fn live_tx_secret(key: &str, stream_name: &str, tx_time: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(key.as_bytes());
        hasher.update(stream_name.as_bytes());
        hasher.update(tx_time.as_bytes());
        hex::encode(hasher.finalize())
    }
}

fn hmac_sha256(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use serde_json::Value;
    use std::io::Read;

    fn decode_user_sig(sig: &str) -> Value {
        let restored: String = sig
            .chars()
            .map(|c| match c {
                '*' => '+',
                '-' => '/',
                '_' => '=',
                other => other,
            })
            .collect();
        let compressed = general_purpose::STANDARD.decode(restored).unwrap();
        let mut json = String::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_string(&mut json)
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_generate_nonce() {
        let nonce = TencentAuth::generate_nonce();
        assert!(nonce.len() == 8);
        assert!(nonce.parse::<u64>().is_ok());
    }

    #[test]
    fn test_random_u32_varies() {
        let values: Vec<u32> = (0..8).map(|_| TencentAuth::random_u32()).collect();
        assert!(values.iter().any(|v| *v != values[0]));
    }

    #[test]
    fn test_get_timestamp() {
        let timestamp = TencentAuth::get_timestamp();
        assert!(timestamp > 0);
    }

    #[test]
    fn test_tc3_authorization_layout() {
        let authorization = TencentAuth::tc3_authorization(
            "AKIDtest",
            "secret",
            "sms",
            "sms.tencentcloudapi.com",
            1551113065, // 2019-02-25T16:44:25Z
            "{}",
        );

        assert!(authorization.starts_with(
            "TC3-HMAC-SHA256 Credential=AKIDtest/2019-02-25/sms/tc3_request, SignedHeaders=content-type;host, Signature="
        ));
        let signature = authorization.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(hex::decode(signature).is_ok());
    }

    #[test]
    fn test_tc3_signature_depends_on_payload() {
        let sign = |payload: &str| {
            TencentAuth::tc3_authorization("id", "key", "live", "live.tencentcloudapi.com", 1700000000, payload)
        };
        assert_eq!(sign("{\"A\":1}"), sign("{\"A\":1}"));
        assert_ne!(sign("{\"A\":1}"), sign("{\"A\":2}"));
    }

    #[test]
    fn test_user_sig_round_trips_to_tls_document() {
        let sig = TencentAuth::generate_user_sig(1400000000, "im-key", "administrator", 86400, 1700000000);

        assert!(!sig.contains('+') && !sig.contains('/') && !sig.contains('='));

        let document = decode_user_sig(&sig);
        assert_eq!(document["TLS.ver"], "2.0");
        assert_eq!(document["TLS.identifier"], "administrator");
        assert_eq!(document["TLS.sdkappid"], 1400000000u64);
        assert_eq!(document["TLS.expire"], 86400);
        assert_eq!(document["TLS.time"], 1700000000i64);

        let content = "TLS.identifier:administrator\nTLS.sdkappid:1400000000\nTLS.time:1700000000\nTLS.expire:86400\n";
        let expected = general_purpose::STANDARD.encode(hmac_sha256(b"im-key", content.as_bytes()));
        assert_eq!(document["TLS.sig"], expected);
    }

    #[test]
    fn test_live_tx_secret() {
        // md5("") is the well-known d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(TencentAuth::live_tx_secret("", "", ""), "d41d8cd98f00b204e9800998ecf8427e");

        let secret = TencentAuth::live_tx_secret("key", "stream", "5C2ACC7F");
        assert_eq!(secret.len(), 32);
        assert_eq!(secret, secret.to_lowercase());
    }
}
