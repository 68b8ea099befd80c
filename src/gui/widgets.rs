use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input};
use iced::{Alignment::Center, Color, Element, Length};

use crate::core::status::{CountryStatus, StatusFilter};
use crate::gui::map_view::MapView;
use crate::gui::message::Message;
use crate::gui::state::{AppState, MapState};
use crate::map::scene::Rgba;

const SIDEBAR_WIDTH: f32 = 320.0;

fn to_color(c: Rgba) -> Color {
    Color::from_rgba(c.r, c.g, c.b, c.a)
}

fn status_glyph(status: Option<CountryStatus>) -> Element<'static, Message> {
    let (glyph, color) = match status {
        Some(CountryStatus::Visited) => ("●", to_color(Rgba::VISITED)),
        Some(CountryStatus::Wishlist) => ("●", to_color(Rgba::WISHLIST)),
        None => ("○", to_color(Rgba::UNMARKED)),
    };
    text(glyph).color(color).into()
}

/// Top bar: active profile selector, add form, delete with inline
/// confirmation, import/export.
pub fn profile_bar(state: &AppState) -> Element<'_, Message> {
    let names: Vec<String> = state.vm.profiles().iter().map(|p| p.name.clone()).collect();
    let active = state.vm.active_profile();

    let mut bar = row![
        text(active.emoji.clone()).size(22.0),
        pick_list(
            names,
            Some(active.name.clone()),
            Message::ProfileSelected
        ),
        text_input("new profile name", &state.new_profile_name)
            .on_input(Message::NewProfileNameChanged)
            .on_submit(Message::AddProfile)
            .width(Length::Fixed(160.0)),
        text_input("emoji", &state.new_profile_emoji)
            .on_input(Message::NewProfileEmojiChanged)
            .width(Length::Fixed(60.0)),
        button("Add").on_press(Message::AddProfile),
        button("Delete").on_press(Message::DeleteRequested),
    ]
    .spacing(10)
    .align_y(Center);

    if let Some(name) = &state.pending_delete {
        bar = bar.push(text(format!("Delete \"{name}\" and its markings?")));
        bar = bar.push(button("Confirm").on_press(Message::DeleteConfirmed));
        bar = bar.push(button("Cancel").on_press(Message::DeleteCancelled));
    }

    bar = bar.push(iced::widget::space::horizontal());
    bar = bar.push(button("Import").on_press(Message::ImportRequested));
    bar = bar.push(button("Export").on_press(Message::ExportRequested));

    container(bar).padding(10).width(Length::Fill).into()
}

/// Dismissable error/info line under the profile bar.
pub fn banner(message: &str) -> Element<'_, Message> {
    container(
        row![
            text(message).color(Color::from_rgb(0.95, 0.55, 0.45)),
            button("Dismiss").on_press(Message::DismissBanner),
        ]
        .spacing(10)
        .align_y(Center),
    )
    .padding([4.0, 10.0])
    .width(Length::Fill)
    .into()
}

fn stats_line(state: &AppState) -> Element<'_, Message> {
    let stats = state.vm.stats();
    row![
        text(format!("Visited {} ({}%)", stats.visited, stats.visited_percent))
            .color(to_color(Rgba::VISITED)),
        text(format!(
            "Wishlist {} ({}%)",
            stats.wishlist, stats.wishlist_percent
        ))
        .color(to_color(Rgba::WISHLIST)),
        text(format!(
            "Remaining {} ({}%)",
            stats.remaining, stats.remaining_percent
        )),
    ]
    .spacing(12)
    .into()
}

/// Searchable, filterable country list sharing the map's status state.
pub fn sidebar(state: &AppState) -> Element<'_, Message> {
    let countries = state.vm.filtered_countries(&state.query, state.filter);

    let rows = countries.into_iter().map(|country| {
        let status = state.vm.status_of(&country.id);
        button(
            row![
                status_glyph(status),
                text(country.name.clone()),
                iced::widget::space::horizontal(),
                text(country.code.clone()).size(12.0),
            ]
            .spacing(8)
            .align_y(Center),
        )
        .style(button::text)
        .width(Length::Fill)
        .on_press(Message::CountryRowClicked(country.id.clone()))
        .into()
    });

    column![
        text_input("search countries", &state.query).on_input(Message::SearchChanged),
        pick_list(
            StatusFilter::ALL,
            Some(state.filter),
            Message::FilterChanged
        )
        .width(Length::Fill),
        stats_line(state),
        scrollable(column(rows).spacing(2)).height(Length::Fill),
    ]
    .spacing(10)
    .padding(10)
    .width(SIDEBAR_WIDTH)
    .into()
}

/// The map canvas, or its loading/unavailable placeholders.
pub fn map_panel(state: &AppState) -> Element<'_, Message> {
    match &state.map {
        MapState::Loading => container(text("Loading map…"))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        MapState::Unavailable(reason) => container(
            column![
                text("Map unavailable").size(24.0),
                text(reason.clone()),
                text("The country list on the left still works."),
            ]
            .spacing(10)
            .align_x(Center),
        )
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into(),
        MapState::Ready(scene) => container(MapView::widget(scene, &state.map_cache))
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    }
}
