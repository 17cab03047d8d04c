use secblog_core::error::AppError;

const FENCE: &str = "```";

/// Info strings look like `html` or `c++`; anything with markup is content.
fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_' | '.'))
}

/// Normalize a generated section before it is staged.
///
/// When the reply opens with a Markdown fence (```` ```html ````), only the
/// text up to the last closing fence is kept.
pub fn clean_section_html(section: &str, output: &str) -> Result<String, AppError> {
    let trimmed = output.trim();
    let body = match trimmed.strip_prefix(FENCE) {
        Some(rest) => {
            let (first, tail) = rest.split_once('\n').unwrap_or((rest, ""));
            let inner = if is_info_string(first) { tail } else { rest };
            match inner.rfind(FENCE) {
                Some(end) => &inner[..end],
                None => inner,
            }
        }
        None => trimmed,
    }
    .trim();

    if body.is_empty() {
        return Err(AppError::new(
            "EXTERNAL_LLM_FAILED",
            "Model returned an empty blog section",
        )
        .with_details(format!("section={section}")));
    }
    Ok(body.to_string())
}
