use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    payload::DataPoint,
    price::Price,
    sample::TariffSample,
    signal::TariffSignal,
};

pub fn build_forecast_table(points: &[DataPoint]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "Value", "Flag", "Signal"]);
    for point in points {
        let signal = point.defined_value().and_then(TariffSignal::from_value);
        table.add_row(vec![
            point.from.map_or_else(empty_cell, |from| {
                Cell::new(from.format("%b %d")).add_attribute(Attribute::Dim)
            }),
            point.from.map_or_else(empty_cell, |from| Cell::new(from.format("%H:%M"))),
            point.value.map_or_else(empty_cell, |value| {
                Cell::new(value).set_alignment(CellAlignment::Right)
            }),
            point.flag.map_or_else(empty_cell, |flag| {
                Cell::new(flag).add_attribute(Attribute::Dim).fg(
                    if flag == DataPoint::MISSING_FLAG { Color::Red } else { Color::Reset },
                )
            }),
            signal.map_or_else(
                || Cell::new("unavailable").add_attribute(Attribute::Dim),
                |signal| Cell::new(signal).fg(signal.color()),
            ),
        ]);
    }
    table
}

pub fn build_sample_table(sample: &TariffSample) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Signal", "Tariff", "Energy", "Total", "Sun window", "Next start", "Next end"]);
    table.add_row(vec![
        Cell::new(sample.signal).fg(sample.signal.color()),
        price_cell(sample.price),
        price_cell(sample.energy_price),
        price_cell(sample.total_price()),
        if sample.sun_window.active {
            Cell::new("on").fg(Color::Green)
        } else {
            Cell::new("off").add_attribute(Attribute::Dim)
        },
        sample
            .sun_window
            .start
            .map_or_else(empty_cell, |start| Cell::new(start.format("%b %d %H:%M"))),
        sample.sun_window.end.map_or_else(empty_cell, |end| Cell::new(end.format("%b %d %H:%M"))),
    ]);
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn empty_cell() -> Cell {
    Cell::new("")
}

fn price_cell(price: Option<Price>) -> Cell {
    price.map_or_else(
        || Cell::new("unavailable").add_attribute(Attribute::Dim),
        |price| Cell::new(format!("{price:?}")).set_alignment(CellAlignment::Right),
    )
}
