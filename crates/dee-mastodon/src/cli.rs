use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Output as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Suppress decorative output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "dee-mastodon",
    version,
    about = "Mastodon hashtag CLI",
    long_about = "dee-mastodon - Follow, feature, and list hashtags on a Mastodon account.",
    after_help = "EXAMPLES:\n  dee-mastodon config set instance https://mastodon.social\n  dee-mastodon config set access_token <token>\n  dee-mastodon tags followed\n  dee-mastodon tags follow rust --json\n  dee-mastodon tags unfollow '#rust'\n  dee-mastodon tags info rust -j\n  dee-mastodon tags feature rust\n  dee-mastodon tags featured --json\n  dee-mastodon tags unfeature rust"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Followed and featured hashtags
    Tags(TagsArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List hashtags you follow
    Followed,
    /// Follow a hashtag
    Follow(TagNameArgs),
    /// Unfollow a hashtag
    Unfollow(TagNameArgs),
    /// Show a hashtag and whether you follow it
    Info(TagNameArgs),
    /// List hashtags featured on your profile
    Featured,
    /// Feature a hashtag on your profile
    Feature(TagNameArgs),
    /// Stop featuring a hashtag, by name or featured tag id
    Unfeature(UnfeatureArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TagNameArgs {
    /// Hashtag, with or without the leading #
    pub name: String,
}

#[derive(Debug, Clone, Args)]
pub struct UnfeatureArgs {
    /// Featured tag name or id
    pub tag: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Set a config value (instance|access_token)
    Set(ConfigSetArgs),
    /// Show current config
    Show,
    /// Print config path
    Path,
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Config key: instance or access_token
    pub key: String,
    /// Config value
    pub value: String,
}
