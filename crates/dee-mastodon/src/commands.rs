use anyhow::Result;
use tracing::debug;

use crate::api::MastodonClient;
use crate::cli::{ConfigCommand, ConfigSetArgs, TagsCommand};
use crate::config::{self, AppConfig};
use crate::display::{self, Action, Rendered, NOT_FOLLOWING_ANY, NO_FEATURED};
use crate::entities::{self, EmptyRecord, FeaturedTag, Tag};
use crate::models::{AppError, OutputMode, SuccessItem, SuccessMessage};

pub fn tags(command: &TagsCommand, mode: &OutputMode) -> Result<()> {
    let credentials = config::require_credentials()?;
    debug!(instance = %credentials.instance, "using instance");
    let client = MastodonClient::new(&credentials)?;

    let rendered = match command {
        TagsCommand::Followed => followed(&client, mode)?,
        TagsCommand::Follow(args) => follow(&client, mode, &args.name)?,
        TagsCommand::Unfollow(args) => unfollow(&client, mode, &args.name)?,
        TagsCommand::Info(args) => info(&client, mode, &args.name)?,
        TagsCommand::Featured => featured(&client, mode)?,
        TagsCommand::Feature(args) => feature(&client, mode, &args.name)?,
        TagsCommand::Unfeature(args) => unfeature(&client, mode, &args.tag)?,
    };

    rendered.print()
}

fn followed(client: &MastodonClient, mode: &OutputMode) -> Result<Rendered> {
    let raw = client.followed_tags()?;
    let tags: Vec<Tag> = entities::map_many(&raw)?;
    Ok(display::render_listing(mode, &tags, NOT_FOLLOWING_ANY)?)
}

fn follow(client: &MastodonClient, mode: &OutputMode, name: &str) -> Result<Rendered> {
    let name = normalize_tag_name(name)?;
    let tag: Tag = entities::map_one(&client.follow_tag(&name)?)?;
    Ok(display::render_confirmation(
        mode,
        Action::Followed,
        &name,
        &tag,
    )?)
}

fn unfollow(client: &MastodonClient, mode: &OutputMode, name: &str) -> Result<Rendered> {
    let name = normalize_tag_name(name)?;
    let tag: Tag = entities::map_one(&client.unfollow_tag(&name)?)?;
    Ok(display::render_confirmation(
        mode,
        Action::Unfollowed,
        &name,
        &tag,
    )?)
}

fn info(client: &MastodonClient, mode: &OutputMode, name: &str) -> Result<Rendered> {
    let name = normalize_tag_name(name)?;
    let tag: Tag = entities::map_one(&client.tag(&name)?)?;
    Ok(display::render_tag_info(mode, &tag)?)
}

fn featured(client: &MastodonClient, mode: &OutputMode) -> Result<Rendered> {
    let tags = featured_tags(client)?;
    Ok(display::render_listing(mode, &tags, NO_FEATURED)?)
}

fn feature(client: &MastodonClient, mode: &OutputMode, name: &str) -> Result<Rendered> {
    let name = normalize_tag_name(name)?;
    let tag: FeaturedTag = entities::map_one(&client.feature_tag(&name)?)?;
    Ok(display::render_confirmation(
        mode,
        Action::Featured,
        &tag.name,
        &tag,
    )?)
}

fn unfeature(client: &MastodonClient, mode: &OutputMode, name_or_id: &str) -> Result<Rendered> {
    let tags = featured_tags(client)?;
    let tag = find_featured(&tags, name_or_id)
        .ok_or_else(|| AppError::NotFound(format!("featured tag `{name_or_id}`")))?;
    debug!(id = %tag.id, name = %tag.name, "resolved featured tag");

    client.unfeature_tag(&tag.id)?;
    Ok(display::render_confirmation(
        mode,
        Action::Unfeatured,
        &tag.name,
        &EmptyRecord::default(),
    )?)
}

fn featured_tags(client: &MastodonClient) -> Result<Vec<FeaturedTag>> {
    let raw = client.featured_tags()?;
    Ok(entities::map_many(&raw)?)
}

/// An exact id match wins over a name match.
fn find_featured<'a>(tags: &'a [FeaturedTag], name_or_id: &str) -> Option<&'a FeaturedTag> {
    let wanted = name_or_id.trim();
    if let Some(tag) = tags.iter().find(|t| t.id == wanted) {
        return Some(tag);
    }
    let name = wanted.trim_start_matches('#').to_lowercase();
    tags.iter().find(|t| t.name.to_lowercase() == name)
}

fn normalize_tag_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim().trim_start_matches('#');
    if entities::is_valid_tag_name(name) {
        Ok(name.to_string())
    } else {
        Err(AppError::InvalidArgument(format!("invalid hashtag `{raw}`")))
    }
}

pub fn config(command: &ConfigCommand, mode: &OutputMode) -> Result<()> {
    match command {
        ConfigCommand::Set(args) => config_set(args, mode),
        ConfigCommand::Show => config_show(mode),
        ConfigCommand::Path => {
            println!("{}", config::config_path()?.display());
            Ok(())
        }
    }
}

fn config_set(args: &ConfigSetArgs, mode: &OutputMode) -> Result<()> {
    let mut cfg = config::load_config_or_default()?;
    cfg.set(&args.key, &args.value)?;
    config::save_config(&cfg)?;

    let message = format!("Saved {}", args.key);
    if mode.json {
        print_json(&SuccessMessage { ok: true, message })
    } else if mode.quiet {
        Ok(())
    } else {
        println!("{message}");
        Ok(())
    }
}

fn config_show(mode: &OutputMode) -> Result<()> {
    #[derive(serde::Serialize)]
    struct ConfigShowItem {
        path: String,
        instance: Option<String>,
        access_token_set: bool,
    }

    let path = config::config_path()?;
    let cfg: AppConfig = config::effective_config()?;
    let item = ConfigShowItem {
        path: path.display().to_string(),
        instance: cfg.instance,
        access_token_set: cfg
            .access_token
            .is_some_and(|token| !token.trim().is_empty()),
    };

    if mode.json {
        print_json(&SuccessItem { ok: true, item })
    } else {
        println!("path: {}", item.path);
        println!("instance: {}", item.instance.as_deref().unwrap_or("(not set)"));
        println!("access_token_set: {}", item.access_token_set);
        Ok(())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
