pub fn blog_section_prompt(section: &str, topic: &str) -> String {
    format!(
        r#"Write a detailed, fact-based blog section on "{section}" for the topic "{topic}".
- Begin with the section heading wrapped in HTML <h3> tags.
- Wrap code examples in HTML tags <pre><code class="language-python">. Wrap all other content in <p> tags.
- Ensure clarity, accuracy, and logical flow.
- Avoid vague statements; focus on providing insights.

Target audience includes both beginners and professionals. Maintain a professional yet engaging tone.
"#
    )
}
