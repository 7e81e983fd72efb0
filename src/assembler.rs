use chrono::{DateTime, Utc};

use crate::error::{Result, SiteGenError};
use crate::models::GeneratedDocument;

const FENCE: &str = "```";
const HTML_TAG: &str = "html";

/// Everything before the fragment.
pub const SCAFFOLD_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated Website</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        @import url('https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap');
        body { font-family: 'Inter', sans-serif; }
        .fade-in { animation: fadeIn 0.6s ease-out; }
        @keyframes fadeIn { from { opacity: 0; transform: translateY(20px); } to { opacity: 1; transform: translateY(0); } }
        .hover-scale { transition: transform 0.2s ease; }
        .hover-scale:hover { transform: scale(1.05); }
        .gradient-bg { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
        .glass { background: rgba(255, 255, 255, 0.1); backdrop-filter: blur(10px); border: 1px solid rgba(255, 255, 255, 0.2); }
    </style>
</head>
<body>
"#;

/// Everything after the fragment.
pub const SCAFFOLD_TAIL: &str = r##"
<script>
    // Add smooth scrolling and fade-in animations
    document.addEventListener('DOMContentLoaded', function() {
        const elements = document.querySelectorAll('section, .card, .feature');
        elements.forEach((el, index) => {
            setTimeout(() => {
                el.classList.add('fade-in');
            }, index * 100);
        });

        document.querySelectorAll('a[href^="#"]').forEach(anchor => {
            anchor.addEventListener('click', function (e) {
                e.preventDefault();
                const target = document.querySelector(this.getAttribute('href'));
                if (target) {
                    target.scrollIntoView({ behavior: 'smooth', block: 'start' });
                }
            });
        });
    });
</script>
</body>
</html>"##;

/// Strip a leading and trailing markdown fence from model output.
///
/// Only the exact leading/trailing forms are recognized. Anything else is left alone.
pub fn sanitize(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = match rest.split_once('\n') {
            // info string line such as "html" or "html title=x"
            Some((info, body)) if !info.contains('<') => body,
            _ => rest.strip_prefix(HTML_TAG).unwrap_or(rest),
        };
    }

    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Wrap a body fragment in the fixed document scaffolding.
pub fn wrap_fragment(fragment: &str) -> String {
    let mut html = String::with_capacity(SCAFFOLD_HEAD.len() + fragment.len() + SCAFFOLD_TAIL.len());
    html.push_str(SCAFFOLD_HEAD);
    html.push_str(fragment);
    html.push_str(SCAFFOLD_TAIL);
    html
}

/// Turn raw model output into a complete document stamped with the current time.
pub fn assemble(raw_response: &str, source_prompt: &str, model_id: &str) -> Result<GeneratedDocument> {
    assemble_at(raw_response, source_prompt, model_id, Utc::now())
}

pub fn assemble_at(
    raw_response: &str,
    source_prompt: &str,
    model_id: &str,
    generated_at: DateTime<Utc>,
) -> Result<GeneratedDocument> {
    if raw_response.trim().is_empty() {
        return Err(SiteGenError::EmptyResponse(
            "model returned no content".to_string(),
        ));
    }

    let fragment = sanitize(raw_response);
    if fragment.is_empty() {
        return Err(SiteGenError::EmptyResponse(
            "model returned only code fence markers".to_string(),
        ));
    }

    tracing::debug!(
        raw_len = raw_response.len(),
        fragment_len = fragment.len(),
        "Assembling generated document"
    );

    Ok(GeneratedDocument {
        html: wrap_fragment(fragment),
        source_prompt: source_prompt.to_string(),
        generated_at,
        model_id: model_id.to_string(),
    })
}
