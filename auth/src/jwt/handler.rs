use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::RegisteredClaims;
use super::errors::JwtError;

/// JWT token handler bound to one secret, one algorithm, one issuer and one audience.
///
/// Each token kind gets its own handler, so a token minted for one kind never
/// verifies against another kind's key or audience.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret for signing and verification
    /// * `algorithm` - The single accepted signing algorithm
    /// * `issuer` - Value written to and required in `iss`
    /// * `audience` - Value written to and required in `aud`
    ///
    /// # Security Notes
    /// - The secret should be at least as long as the HMAC output (32 bytes for HS256)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            issuer,
            audience,
            validation,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The header algorithm is checked before the key is touched. After the
    /// library has verified the signature and registered claims, timing,
    /// issuer and audience are checked again against the current clock.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `TokenNotValidYet` - `nbf` is in the future
    /// * `InvalidToken` - Bad structure, algorithm, signature, issuer or audience
    pub fn decode<T>(&self, token: &str) -> Result<T, JwtError>
    where
        T: DeserializeOwned + RegisteredClaims,
    {
        let header = decode_header(token)
            .map_err(|e| JwtError::InvalidToken(format!("malformed header: {}", e)))?;

        if header.alg != self.algorithm {
            return Err(JwtError::InvalidToken(format!(
                "algorithm {:?} is not allowed",
                header.alg
            )));
        }

        let token_data =
            decode::<T>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    ErrorKind::ImmatureSignature => JwtError::TokenNotValidYet,
                    _ => JwtError::InvalidToken(e.to_string()),
                }
            })?;

        self.check_registered_claims(&token_data.claims, Utc::now().timestamp())?;

        Ok(token_data.claims)
    }

    fn check_registered_claims<T: RegisteredClaims>(
        &self,
        claims: &T,
        now: i64,
    ) -> Result<(), JwtError> {
        if claims.is_not_yet_valid(now) {
            return Err(JwtError::TokenNotValidYet);
        }

        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        if claims.issuer() != self.issuer {
            return Err(JwtError::InvalidToken(format!(
                "unexpected issuer {}",
                claims.issuer()
            )));
        }

        if !claims.audience().contains(&self.audience) {
            return Err(JwtError::InvalidToken("audience mismatch".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::identity::Identity;
    use crate::jwt::claims::AccessClaims;
    use crate::jwt::claims::Audience;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn handler() -> JwtHandler {
        JwtHandler::new(SECRET, Algorithm::HS256, "catering", "catering-api")
    }

    fn claims() -> AccessClaims {
        AccessClaims::new(
            &Identity::new(1, "admin"),
            "catering",
            "catering-api",
            Utc::now(),
            Duration::minutes(15),
        )
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = handler();
        let claims = claims();

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded: AccessClaims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_invalid_token() {
        let result = handler().decode::<AccessClaims>("invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let other = JwtHandler::new(
            b"secret2_at_least_32_bytes_long_key!",
            Algorithm::HS256,
            "catering",
            "catering-api",
        );

        let token = other.encode(&claims()).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_rejects_other_hmac_algorithm() {
        // Same secret, different algorithm in the header
        let other = JwtHandler::new(SECRET, Algorithm::HS512, "catering", "catering-api");
        let token = other.encode(&claims()).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_rejects_none_algorithm() {
        let token = handler().encode(&claims()).expect("Failed to encode token");
        let payload = token.split('.').nth(1).unwrap();

        // {"alg":"none","typ":"JWT"}
        let forged = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{}.", payload);

        let result = handler().decode::<AccessClaims>(&forged);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_rejects_asymmetric_algorithm_header() {
        let token = handler().encode(&claims()).expect("Failed to encode token");
        let mut parts = token.split('.');
        parts.next();
        let payload = parts.next().unwrap();
        let signature = parts.next().unwrap();

        // {"alg":"RS256","typ":"JWT"} with the original HMAC signature bytes
        let forged = format!(
            "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{}.{}",
            payload, signature
        );

        let result = handler().decode::<AccessClaims>(&forged);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_wrong_audience() {
        let other = JwtHandler::new(SECRET, Algorithm::HS256, "catering", "catering-refresh");
        let mut claims = claims();
        claims.aud = Audience::from("catering-refresh");
        let token = other.encode(&claims).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_wrong_issuer() {
        let mut claims = claims();
        claims.iss = "someone-else".to_string();
        let token = handler().encode(&claims).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_expired() {
        let mut claims = claims();
        claims.iat -= 3600;
        claims.nbf -= 3600;
        claims.exp = Utc::now().timestamp() - 5;
        let token = handler().encode(&claims).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_decode_not_valid_yet() {
        let mut claims = claims();
        claims.nbf = Utc::now().timestamp() + 60;
        let token = handler().encode(&claims).expect("Failed to encode token");

        let result = handler().decode::<AccessClaims>(&token);
        assert_eq!(result, Err(JwtError::TokenNotValidYet));
    }

    #[test]
    fn test_registered_claims_rechecked_independently() {
        let handler = handler();
        let claims = claims();
        let now = claims.iat;

        assert!(handler.check_registered_claims(&claims, now).is_ok());
        assert_eq!(
            handler.check_registered_claims(&claims, claims.exp + 1),
            Err(JwtError::TokenExpired)
        );
        assert_eq!(
            handler.check_registered_claims(&claims, claims.nbf - 1),
            Err(JwtError::TokenNotValidYet)
        );

        let mut foreign = claims.clone();
        foreign.aud = Audience::Single("elsewhere".to_string());
        assert!(matches!(
            handler.check_registered_claims(&foreign, now),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
