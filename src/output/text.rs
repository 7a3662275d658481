//! Plain-text record writer

use crate::extract::Project;
use crate::output::traits::{OutputResult, RecordWriter};

/// Writes records as labelled lines followed by the long description
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl RecordWriter for TextWriter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, project: &Project) -> OutputResult<String> {
        Ok(format_project(project))
    }
}

/// Formats a project as plain text
pub fn format_project(project: &Project) -> String {
    let team: Vec<&str> = project
        .team_members
        .iter()
        .map(|member| member.name.as_str())
        .collect();
    let hackathon = project
        .hackathon
        .as_ref()
        .map_or("Unknown", |hackathon| hackathon.name.as_str());

    let mut text = String::new();
    text.push_str(&format!("Title: {}\n", project.title));
    text.push_str(&format!("Project ID: {}\n", project.id));
    text.push_str(&format!("Project Link: {}\n", project.link));
    text.push_str(&format!(
        "Short Description: {}\n",
        project.short_description.as_deref().unwrap_or("N/A")
    ));
    text.push_str(&format!("No. of Likes: {}\n", project.likes));
    text.push_str(&format!("No. of Comments: {}\n", project.comments));
    text.push_str(&format!("Team Members: {}\n", bullet_list(&team)));
    text.push_str(&format!("Hackathon submitted to: {}\n", hackathon));
    text.push_str(&format!("Awards Won: {}\n", bullet_list(&project.awards)));
    text.push_str(&format!("Built with: {}\n", bullet_list(&project.built_with)));
    text.push_str(&format!(
        "Relevant Links: {}\n\n",
        bullet_list(&project.relevant_links)
    ));
    text.push_str("Long description:\n\n");
    text.push_str(project.long_description.trim_end());
    text.push('\n');
    text
}

/// Renders items as an indented `-` list starting on the next line
fn bullet_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }

    items
        .iter()
        .map(|item| format!("\n  - {}", item.as_ref()))
        .collect()
}
