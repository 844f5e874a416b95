use anyhow::{Result, bail};
use daydeck_core::deck::Deck;
use daydeck_core::layout::SectionId;
use daydeck_core::state::Dashboard;
use owo_colors::OwoColorize;

pub fn show(deck: &Deck) -> Result<()> {
    let store = deck.store()?;
    let dashboard = Dashboard::load(&store, deck.config().user_email.clone());

    let layout = dashboard.layout();
    for slot in daydeck_core::layout::Slot::ALL {
        println!("{}", slot.bold());
        for id in layout.slot(slot) {
            println!("   {id}");
        }
    }

    Ok(())
}

pub async fn mv(deck: &Deck, section: &str, onto: &str) -> Result<()> {
    let dragged: SectionId = section.parse()?;
    let target: SectionId = onto.parse()?;

    let store = deck.store()?;
    let remote = super::remote_for(deck)?;
    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());

    let Some(dragged_slot) = dashboard.layout().slot_of(dragged) else {
        bail!("Section '{dragged}' is not placed in any slot");
    };
    let Some(target_slot) = dashboard.layout().slot_of(target) else {
        bail!("Section '{target}' is not placed in any slot");
    };

    // Sections never change slots, only their order within one.
    if dragged_slot != target_slot {
        println!(
            "{}",
            format!(
                "'{dragged}' is in the {dragged_slot} slot, '{target}' in the {target_slot} slot. Layout unchanged."
            )
            .yellow()
        );
        return Ok(());
    }

    dashboard.begin_drag(dragged, dragged_slot);
    if !dashboard.drop_onto(target, target_slot) {
        bail!("Could not reorder '{dragged}' onto '{target}'");
    }

    super::persist_and_publish(&dashboard, &store, &remote).await?;

    println!("{}", format!("{dragged_slot} slot is now:").bold());
    for id in dashboard.layout().slot(dragged_slot) {
        println!("   {id}");
    }

    Ok(())
}
