use crate::app::{filter_options, App};
use ratatui::{layout::Rect, text::Line, widgets::Tabs, Frame};

/// Render the category filter bar: "All" followed by every category.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 1 {
        return;
    }

    let titles: Vec<Line> = filter_options()
        .map(|option| match option {
            Some(category) => Line::from(category.label()),
            None => Line::from("All"),
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.filter_index())
        .style(app.style("category_normal"))
        .highlight_style(app.style("category_selected"))
        .divider("|");

    f.render_widget(tabs, area);
}
