use camino::Utf8PathBuf;

/// CLI Options
#[derive(Debug, argh::FromArgs)]
#[argh(description = "a tool to fetch images and events from dropcam cameras")]
pub struct CliOptions {
    #[argh(
        option,
        description = "the path to the config",
        default = "Utf8PathBuf::from(\"./dropcam.toml\")"
    )]
    pub config: Utf8PathBuf,

    #[argh(subcommand)]
    pub subcommand: Option<Subcommand>,
}

#[derive(Debug, argh::FromArgs)]
#[argh(subcommand)]
pub enum Subcommand {
    Snapshot(SnapshotOptions),
    List(ListOptions),
    Events(EventsOptions),
    SetProperty(SetPropertyOptions),
}

impl Default for Subcommand {
    fn default() -> Self {
        Self::Snapshot(SnapshotOptions::default())
    }
}

#[derive(Debug, Default, argh::FromArgs)]
#[argh(
    subcommand,
    name = "snapshot",
    description = "save an image from every camera and print recent events"
)]
pub struct SnapshotOptions {
    #[argh(
        option,
        short = 'o',
        description = "the dir to output images. defaults to the config's out_dir"
    )]
    pub out_dir: Option<Utf8PathBuf>,

    #[argh(option, description = "the image width")]
    pub width: Option<u32>,

    #[argh(
        option,
        description = "the capture time, in seconds since the epoch. defaults to now"
    )]
    pub time: Option<i64>,
}

#[derive(Debug, Clone, Copy, argh::FromArgs)]
#[argh(subcommand, name = "list", description = "list the visible cameras")]
pub struct ListOptions {}

#[derive(Debug, argh::FromArgs)]
#[argh(subcommand, name = "events", description = "print the events of a camera")]
pub struct EventsOptions {
    #[argh(positional, description = "the camera index or uuid")]
    pub camera: String,

    #[argh(
        option,
        description = "how far back to look, in seconds. defaults to the config's event_window"
    )]
    pub since: Option<u64>,
}

#[derive(Debug, argh::FromArgs)]
#[argh(
    subcommand,
    name = "set-property",
    description = "set a camera property, ex: `set-property 0 streaming.enabled false`"
)]
pub struct SetPropertyOptions {
    #[argh(positional, description = "the camera index or uuid")]
    pub camera: String,

    #[argh(positional, description = "the property name")]
    pub name: String,

    #[argh(positional, description = "the property value")]
    pub value: String,
}
