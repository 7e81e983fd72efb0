use std::fmt;

use crate::error::Result;
use crate::validation::require_non_empty;

/// Opening line of every compiled prompt.
pub const DIRECTIVE_HEADER: &str =
    "Create a complete, modern, and visually stunning HTML website based on this description:";

const DIRECTIVES: &str = r#"Requirements:
1. Use modern HTML5 semantic elements
2. Include Tailwind CSS classes for beautiful styling (use CDN)
3. Make it fully responsive for all devices
4. Add smooth animations and hover effects
5. Include proper structure with header, main content, and footer
6. Use modern typography and professional color schemes
7. Add interactive elements where appropriate
8. Include placeholder content that fits the theme
9. Make sure all elements are properly styled and functional
10. Add some JavaScript for basic interactivity

IMPORTANT: Return ONLY the HTML content that goes inside the <body> tag. Do not include <!DOCTYPE html>, <html>, <head>, or <body> tags.

The HTML should be production-ready and look professional with:
- Beautiful design with modern UI/UX principles
- Smooth animations using CSS transitions and JavaScript
- Proper spacing and typography
- Consistent color scheme
- Mobile-first responsive design
- Accessibility features

Please generate clean, semantic HTML with Tailwind CSS classes that creates a visually appealing and functional website."#;

/// Instruction text sent to the model for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPrompt(String);

impl CompiledPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CompiledPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wrap a theme description in the fixed directive block.
///
/// The user text is quoted and inserted verbatim so it stays separate from the
/// instructions around it.
pub fn compile(user_prompt: &str) -> Result<CompiledPrompt> {
    require_non_empty("prompt", user_prompt)?;
    Ok(CompiledPrompt(format!(
        "{DIRECTIVE_HEADER} \"{user_prompt}\"\n\n{DIRECTIVES}\n"
    )))
}
