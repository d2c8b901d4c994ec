use crate::app::{App, SubmitForm};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for static strings and borrowed status messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match &app.submit_form {
            Some(SubmitForm::InputUrl { .. }) => {
                Cow::Borrowed("Type or paste a URL | ENTER submit | ESC cancel")
            }
            Some(SubmitForm::Submitting { .. }) => {
                Cow::Borrowed("Summarizing article... | ESC close form")
            }
            None => Cow::Borrowed(
                "[a]dd [Tab/h/l]category [Enter]summary [o]pen [d]elete [r]eload [?]help [q]uit",
            ),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
