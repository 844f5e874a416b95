use anyhow::Result;
use daydeck_core::deck::Deck;
use daydeck_google::Session;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

pub async fn google(deck: &mut Deck) -> Result<()> {
    let email = daydeck_google::auth::connect().await?;

    deck.config_mut().calendar.account = Some(email.clone());
    deck.config_mut().save()?;

    println!("Authenticated as: {email}\n");
    println!(
        "{}",
        "Today's events will show up in the agenda section.".dimmed()
    );

    Ok(())
}

pub fn status(deck: &Deck) -> Result<()> {
    match &deck.config().calendar.account {
        Some(account) if Session::exists(account) => {
            println!("{} {}", account.bold(), "(connected)".green());
        }
        Some(account) => {
            println!(
                "{} {}",
                account.bold(),
                "(session missing; run `daydeck auth google`)".yellow()
            );
        }
        None => {
            println!("No Google account connected. Run `daydeck auth google`.");
        }
    }

    Ok(())
}

pub fn disconnect(deck: &mut Deck) -> Result<()> {
    let Some(account) = deck.config().calendar.account.clone() else {
        println!("{}", "No Google account connected.".dimmed());
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt(format!("Disconnect {account} and delete its session?"))
        .default(false)
        .interact()?;

    if !confirmed {
        return Ok(());
    }

    Session::delete(&account)?;
    deck.config_mut().calendar.account = None;
    deck.config_mut().save()?;

    println!("Disconnected {account}.");

    Ok(())
}
