use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{Result, SiteGenError};
use crate::models::DeploymentRecord;
use crate::validation::require_non_empty;

/// Hex characters of the digest kept as the deployment id.
pub const DEPLOYMENT_ID_LEN: usize = 8;

pub const DEFAULT_URL_TEMPLATE: &str = "https://generated-website-{id}.vercel.app";

pub const SIMULATION_MESSAGE: &str =
    "Website deployed successfully (simulation - no real hosting deployment was performed)";

const ID_PLACEHOLDER: &str = "{id}";

/// Derives content-addressed ids and synthetic URLs for generated sites.
///
/// Nothing is uploaded anywhere. The record only looks like a deployment.
#[derive(Debug, Clone)]
pub struct DeploymentIdentifier {
    url_template: String,
}

impl Default for DeploymentIdentifier {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl DeploymentIdentifier {
    pub fn new(url_template: impl Into<String>) -> Result<Self> {
        let url_template = url_template.into();
        if !url_template.contains(ID_PLACEHOLDER) {
            return Err(SiteGenError::Config(format!(
                "deployment url template must contain {ID_PLACEHOLDER}: {url_template}"
            )));
        }
        Ok(Self { url_template })
    }

    pub fn identify(&self, code: &str, prompt: &str, now: DateTime<Utc>) -> Result<DeploymentRecord> {
        require_non_empty("code", code)?;
        require_non_empty("prompt", prompt)?;

        let id = deployment_id(code, prompt, now);
        let url = self.url_template.replace(ID_PLACEHOLDER, &id);

        tracing::info!(deployment_id = %id, %url, "Website deployment simulated");

        Ok(DeploymentRecord {
            id,
            url,
            created_at: now,
            message: SIMULATION_MESSAGE.to_string(),
            simulated: true,
        })
    }
}

/// Identify with the default host template.
pub fn identify(code: &str, prompt: &str, now: DateTime<Utc>) -> Result<DeploymentRecord> {
    DeploymentIdentifier::default().identify(code, prompt, now)
}

fn deployment_id(code: &str, prompt: &str, now: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(prompt.as_bytes());
    hasher.update(now.to_rfc3339_opts(SecondsFormat::Nanos, true).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..DEPLOYMENT_ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn test_id_is_eight_hex_chars_and_in_url() {
        let record = identify(
            "<section>Photos</section>",
            "a portfolio site for a photographer",
            fixed_time(),
        )
        .unwrap();
        assert_eq!(record.id.len(), DEPLOYMENT_ID_LEN);
        assert!(record.id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(record.url.contains(&record.id));
        assert_eq!(record.url, format!("https://generated-website-{}.vercel.app", record.id));
        assert!(record.simulated);
        assert!(record.message.contains("simulation"));
    }

    #[test]
    fn test_id_varies_with_time() {
        let t1 = fixed_time();
        let t2 = t1 + Duration::milliseconds(1);
        let a = identify("abc", "theme", t1).unwrap();
        let b = identify("abc", "theme", t2).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_id_reproducible_for_same_instant() {
        let t = fixed_time();
        assert_eq!(identify("abc", "theme", t).unwrap().id, identify("abc", "theme", t).unwrap().id);
    }

    #[test]
    fn test_id_matches_digest_of_concatenation() {
        let t = fixed_time();
        let stamp = t.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let expected = hex::encode(Sha256::digest(format!("abctheme{stamp}").as_bytes()));
        assert_eq!(identify("abc", "theme", t).unwrap().id, &expected[..8]);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let t = fixed_time();
        assert!(matches!(identify("", "theme", t), Err(SiteGenError::Validation(_))));
        assert!(matches!(identify("abc", " ", t), Err(SiteGenError::Validation(_))));
    }

    #[test]
    fn test_custom_template() {
        let identifier = DeploymentIdentifier::new("https://{id}.preview.local/").unwrap();
        let record = identifier.identify("abc", "theme", fixed_time()).unwrap();
        assert_eq!(record.url, format!("https://{}.preview.local/", record.id));
        assert!(matches!(
            DeploymentIdentifier::new("https://static.example"),
            Err(SiteGenError::Config(_))
        ));
    }
}
