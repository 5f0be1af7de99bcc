use chrono::Local;
use ophaaldag_core::model::TrashType;
use ophaaldag_core::sensor::SensorKind;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::{App, Screen, SetupField};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("ophaaldag – Twente Milieu pickup sensors")
        .block(Block::default().borders(Borders::ALL).title("Ophaaldag"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::Setup => draw_setup(frame, app, *content_area),
        Screen::Schedule => draw_schedule_view(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::Setup => {
            "Tab next field · Type to edit · ↑/↓ + Space pick resources · Enter apply · q/Ctrl-C quit"
        }
        Screen::Schedule => "r refresh · Esc/←/b back to setup · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text.to_owned())
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_setup(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // postcode
            Constraint::Length(3), // house number
            Constraint::Min(0),    // resources
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [postcode_area, house_number_area, resources_area] = chunks else {
        return;
    };

    let postcode = Paragraph::new(app.postcode_input.as_str())
        .block(field_block("Postcode", app.focus == SetupField::Postcode))
        .wrap(Wrap { trim: true });
    frame.render_widget(postcode, *postcode_area);

    let house_number = Paragraph::new(app.house_number_input.as_str())
        .block(field_block(
            "House number",
            app.focus == SetupField::HouseNumber,
        ))
        .wrap(Wrap { trim: true });
    frame.render_widget(house_number, *house_number_area);

    let items = app
        .resource_keys
        .iter()
        .zip(&app.resource_selected)
        .map(|(key, &selected)| {
            let mark = if selected { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {key} – {}", resource_label(key)))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(field_block(
            "Resources (↑/↓, Space to toggle)",
            app.focus == SetupField::Resources,
        ))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if app.focus == SetupField::Resources && !app.resource_keys.is_empty() {
        state.select(Some(app.resource_index));
    }
    frame.render_stateful_widget(list, *resources_area, &mut state);
}

fn draw_schedule_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(reader) = app.reader.as_ref() else {
        let paragraph = Paragraph::new("No address applied yet.")
            .block(Block::default().borders(Borders::ALL).title("Sensors"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    };

    let updated = reader
        .last_updated()
        .map_or_else(|| "never".to_owned(), |date| date.format("%d-%m-%Y").to_string());
    let title = format!(
        "Sensors for {} {} · updated {updated}",
        reader.postcode(),
        reader.house_number()
    );

    if app.is_loading {
        let paragraph = Paragraph::new("Loading schedule…")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let sensor_height = u16::try_from(app.sensors.len()).unwrap_or(u16::MAX).saturating_add(3);
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(sensor_height), Constraint::Min(0)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [sensor_area, schedule_area] = chunks else {
        return;
    };

    let today = Local::now().date_naive();

    let sensor_rows = app.sensors.iter().map(|sensor| {
        let state = sensor
            .state_on(reader, today)
            .unwrap_or_else(|| "none".to_owned());
        Row::new(vec![Cell::from(sensor.name()), Cell::from(state)])
    });

    let sensor_table = Table::new(
        sensor_rows,
        [Constraint::Length(40), Constraint::Min(20)],
    )
    .header(Row::new(vec!["Sensor", "State"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::default().borders(Borders::ALL).title(title))
    .column_spacing(1);

    frame.render_widget(sensor_table, *sensor_area);

    if reader.schedules().is_empty() {
        let paragraph = Paragraph::new("No upcoming pickups in the current window.")
            .block(Block::default().borders(Borders::ALL).title("Schedule"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *schedule_area);
        return;
    }

    let rows = reader.schedules().iter().map(|schedule| {
        let date = schedule.pickup_date.format("%d-%m-%Y").to_string();
        let weekday = schedule.pickup_date.format("%a").to_string();
        let relative = relative_day_label(schedule.pickup_date, today);
        let label = schedule.trash_type.display_name();

        let mut style = Style::default().fg(trash_color(&schedule.trash_type));
        if schedule.pickup_date <= today {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(date),
            Cell::from(weekday),
            Cell::from(relative),
            Cell::from(label),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Min(20),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Date", "Day", "In", "Stream"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title("Schedule"))
        .column_spacing(1);

    frame.render_widget(table, *schedule_area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title.to_owned());
    if focused {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn resource_label(key: &str) -> String {
    match SensorKind::from_key(key) {
        SensorKind::Today => "today's pickup".to_owned(),
        SensorKind::Tomorrow => "tomorrow's pickup".to_owned(),
        SensorKind::ByType(trash_type) => trash_type.display_name(),
    }
}

fn trash_color(trash_type: &TrashType) -> Color {
    match trash_type {
        TrashType::Grey => Color::Gray,
        TrashType::Green => Color::Green,
        TrashType::Paper => Color::Blue,
        TrashType::Packages => Color::Yellow,
        TrashType::Other(_) => Color::Magenta,
    }
}

fn relative_day_label(date: chrono::NaiveDate, today: chrono::NaiveDate) -> String {
    let delta = (date - today).num_days();
    match delta {
        0 => "today".to_owned(),
        1 => "tomorrow".to_owned(),
        days if days > 1 => format!("in {days} days"),
        days => format!("{} days ago", days.abs()),
    }
}
