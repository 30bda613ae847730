//! Example tabs for a fresh catalog

use sqlx::SqlitePool;
use tracing::info;

use crate::db::{count_tabs, create_tab, NewTab};
use crate::Result;

const EXAMPLE_TABS: &[(&str, &str, &str)] = &[
    (
        "Wish You Were Here",
        "Pink Floyd",
        "\
e|-------------------3---3----|
B|-------------------3---3----|
G|-------0-----0-----0---0----|
D|-----2-----2-----2---2------|
A|---3-----3-----3------------|
E|----------------------------|
",
    ),
    (
        "Stairway to Heaven",
        "Led Zeppelin",
        "\
e|-------5-7-----7-8-----8-2-----2-0---------|
B|-----5-----5-------5-------3-------1---1---|
G|---5---------5-------5-------2-------2---2-|
D|-7-------6-------5-------4-------3---------|
A|-------------------------------------------|
E|-------------------------------------------|
",
    ),
    (
        "Nothing Else Matters",
        "Metallica",
        "\
e|-----------0-----------0-----------0-------|
B|-------0-------0-------0-------0-----------|
G|---0-------0-------0-------0---------------|
D|-------------------------------------------|
A|-------------------------------------------|
E|-0-----------0-----------0-----------0-----|
",
    ),
];

/// Insert the example tabs when the catalog is empty
///
/// Returns the number of tabs inserted; 0 if any tab already exists.
pub async fn seed_example_tabs(pool: &SqlitePool) -> Result<usize> {
    if count_tabs(pool).await? > 0 {
        return Ok(0);
    }

    for (title, artist, content) in EXAMPLE_TABS {
        create_tab(pool, &NewTab::new(*title, *artist, *content)).await?;
    }

    info!("Seeded {} example tabs", EXAMPLE_TABS.len());
    Ok(EXAMPLE_TABS.len())
}
