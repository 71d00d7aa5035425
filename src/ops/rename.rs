use tracing::debug;

use crate::io::card_store;
use crate::io::project_io::ProjectError;
use crate::model::card::CardNumber;
use crate::model::project::Project;
use crate::parse::is_header_line;

/// Give a card a new title, or remove its title when `new_title` is blank.
///
/// Removing the title of a card that has no file yet does nothing; setting a
/// title creates the file.
pub fn rename_card(project: &Project, card: CardNumber, new_title: &str) -> Result<(), ProjectError> {
    if new_title.trim().is_empty() {
        if !card_store::card_exists(project, card) {
            debug!(card = card.get(), "title removal on missing card, nothing to do");
            return Ok(());
        }
        let content = card_store::read_card(project, card)?;
        let updated = remove_title(&content);
        if updated != content {
            card_store::write_card(project, card, &updated)?;
        }
        return Ok(());
    }

    let content = card_store::read_card(project, card)?;
    card_store::write_card(project, card, &set_title(&content, new_title))
}

/// Replace the header line with `# {title}`, or insert one.
///
/// When a header is inserted in front of text, a blank line separates them.
pub fn set_title(content: &str, title: &str) -> String {
    let header = format!("# {}", title);
    let mut lines: Vec<&str> = content.split('\n').collect();

    if lines.first().is_some_and(|l| is_header_line(l)) {
        lines[0] = &header;
    } else {
        lines.insert(0, &header);
        if lines.get(1).is_some_and(|l| !l.trim().is_empty()) {
            lines.insert(1, "");
        }
    }
    lines.join("\n")
}

/// Drop the header line and the blank line right after it, if present
pub fn remove_title(content: &str) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.first().is_some_and(|l| is_header_line(l)) {
        lines.remove(0);
        if lines.first().is_some_and(|l| l.trim().is_empty()) {
            lines.remove(0);
        }
    }
    lines.join("\n")
}
