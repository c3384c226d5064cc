use weather_core::{
    Position, Theme, VisibleDay, WidgetView, day_label, format_temperature,
    provider::openweather::icon_url, widget::ReadyView,
};

/// Text rendering of the widget's loading, error and data states.
pub fn render(view: &WidgetView<'_>) -> String {
    match view {
        WidgetView::Loading => "Loading weather data...\n".to_string(),
        WidgetView::Error { message } => format!("Error: {message}\n"),
        WidgetView::Ready(ready) => render_ready(ready),
    }
}

fn render_ready(view: &ReadyView<'_>) -> String {
    let current = view.current;
    let theme = match view.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };

    let mut out = format!("{}  ({theme} theme, {})\n", view.location_name, view.unit.symbol());
    out.push_str(&format!(
        "Now: {} (feels like {}), {}, humidity {}%, wind {} m/s\n",
        format_temperature(current.temperature_c, view.unit),
        format_temperature(current.feels_like_c, view.unit),
        current.condition.description,
        current.humidity_pct,
        current.wind_speed_mps.round() as i64,
    ));

    if view.window.is_empty() {
        out.push_str("\nNo forecast available.\n");
        return out;
    }

    out.push('\n');
    for card in &view.window {
        out.push_str(&render_card(card, view));
        out.push('\n');
    }

    if let Some(current_day) = view.window.iter().find(|v| v.position == Position::Current) {
        if !current_day.day.condition.icon.is_empty() {
            out.push_str(&format!("\nicon: {}\n", icon_url(&current_day.day.condition.icon)));
        }
    }

    out
}

fn render_card(card: &VisibleDay<'_>, view: &ReadyView<'_>) -> String {
    let (day, numeric) = day_label(card.day.local_time);
    let marker = if card.position == Position::Current { ">" } else { " " };

    format!(
        "{marker} {:<8} {:<9} {:>5}  {:>5}  {:<20} {:>3}%  {:>2} m/s",
        card.position.as_str(),
        day,
        numeric,
        format_temperature(card.day.temperature_c, view.unit),
        card.day.condition.description,
        card.day.humidity_pct,
        card.day.wind_speed_mps.round() as i64,
    )
}
