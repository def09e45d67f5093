//! Command-line surface for `quire-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use quire::config::GlobalOverrides;
use quire::domain::types::{CommentSort, CommentStatus, SortBy, TimeRange};

#[derive(Parser, Debug)]
#[command(name = "quire-cli", version, about = "Blog client: articles, comments, categories and tags", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, register, profile
    Auth(AuthArgs),
    /// Category lookup and management
    Categories(CategoriesArgs),
    /// Tag lookup and management
    Tags(TagsArgs),
    /// Comment threads and moderation
    Comments(CommentsArgs),
    /// Article search and reading
    Articles(ArticlesArgs),
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthCmd,
}

#[derive(Subcommand, Debug)]
pub enum AuthCmd {
    /// Exchange credentials for a token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "QUIRE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Write the issued token to this file
        #[arg(long)]
        save_token: Option<PathBuf>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "QUIRE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long, requires = "captcha_code")]
        captcha_id: Option<String>,
        #[arg(long, requires = "captcha_id")]
        captcha_code: Option<String>,
    },
    /// Fetch a captcha challenge for registration
    Captcha,
    /// Invalidate the current token
    Logout,
    /// Show the signed-in user
    Profile,
    /// Update profile fields
    UpdateProfile {
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        bio_file: Option<PathBuf>,
    },
    /// Upload a new avatar image
    Avatar { path: PathBuf },
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List categories
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one category
    Get { id: i64 },
    /// Resolve a category name to its ID
    Resolve { name: String },
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update a category
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a category
    Delete { id: i64 },
}

#[derive(Parser, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub action: TagsCmd,
}

#[derive(Subcommand, Debug)]
pub enum TagsCmd {
    /// List tags
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Most used tags
    Hot {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one tag
    Get { id: i64 },
    /// Create a tag
    Create {
        #[arg(long)]
        name: String,
    },
    /// Rename a tag
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Delete a tag (refused while articles use it)
    Delete { id: i64 },
}

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub action: CommentsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    /// Show one page of an article's comments
    List {
        #[arg(long)]
        article: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        sort: Option<CommentSortArg>,
        /// Include unmoderated comments (admins only)
        #[arg(long, default_value_t = false)]
        show_all: bool,
        /// Reply pages to load under each comment
        #[arg(long, default_value_t = 0)]
        reply_pages: u32,
    },
    /// Post a comment or a reply
    Submit {
        #[arg(long)]
        article: i64,
        #[arg(long)]
        parent: Option<i64>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Delete a comment
    Delete {
        #[arg(long)]
        article: i64,
        #[arg(long)]
        id: i64,
        /// Parent of the comment when it is a reply
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Approve or reject a comment (admins only)
    Review {
        #[arg(long)]
        article: i64,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: CommentStatusArg,
    },
    /// Comments written by one user
    User {
        #[arg(long)]
        user: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
}

#[derive(Parser, Debug)]
pub struct ArticlesArgs {
    #[command(subcommand)]
    pub action: ArticlesCmd,
}

#[derive(Subcommand, Debug)]
pub enum ArticlesCmd {
    /// Search articles; filters come from a query string and/or flags
    Search(SearchArgs),
    /// Show one article
    Get { id: i64 },
    /// Toggle the like on an article
    Like { id: i64 },
    /// Toggle the favorite on an article
    Favorite { id: i64 },
    /// Reading history of the signed-in user
    History {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
}

#[derive(Parser, Debug, Default)]
pub struct SearchArgs {
    /// Search page query string, e.g. `category=Rust&auto_search=true`
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub sort_by: Option<SortByArg>,
    #[arg(long)]
    pub time_range: Option<TimeRangeArg>,
    /// Comma-separated category IDs
    #[arg(long, value_delimiter = ',')]
    pub category_ids: Vec<i64>,
    /// Comma-separated tag IDs
    #[arg(long, value_delimiter = ',')]
    pub tag_ids: Vec<i64>,
    #[arg(long)]
    pub page: Option<u32>,
}

impl SearchArgs {
    pub fn has_filter_flags(&self) -> bool {
        self.keyword.is_some()
            || self.author.is_some()
            || self.sort_by.is_some()
            || self.time_range.is_some()
            || !self.category_ids.is_empty()
            || !self.tag_ids.is_empty()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CommentSortArg {
    Latest,
    Oldest,
    Popular,
}

impl From<CommentSortArg> for CommentSort {
    fn from(value: CommentSortArg) -> Self {
        match value {
            CommentSortArg::Latest => CommentSort::Latest,
            CommentSortArg::Oldest => CommentSort::Oldest,
            CommentSortArg::Popular => CommentSort::Popular,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CommentStatusArg {
    Approved,
    Rejected,
    Pending,
}

impl CommentStatusArg {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for CommentStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CommentStatusArg> for CommentStatus {
    fn from(value: CommentStatusArg) -> Self {
        match value {
            CommentStatusArg::Approved => CommentStatus::Approved,
            CommentStatusArg::Rejected => CommentStatus::Rejected,
            CommentStatusArg::Pending => CommentStatus::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortByArg {
    Latest,
    Popular,
    Views,
}

impl From<SortByArg> for SortBy {
    fn from(value: SortByArg) -> Self {
        match value {
            SortByArg::Latest => SortBy::Latest,
            SortByArg::Popular => SortBy::Popular,
            SortByArg::Views => SortBy::Views,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TimeRangeArg {
    All,
    Day,
    Week,
    Month,
    Year,
}

impl From<TimeRangeArg> for TimeRange {
    fn from(value: TimeRangeArg) -> Self {
        match value {
            TimeRangeArg::All => TimeRange::All,
            TimeRangeArg::Day => TimeRange::Day,
            TimeRangeArg::Week => TimeRange::Week,
            TimeRangeArg::Month => TimeRange::Month,
            TimeRangeArg::Year => TimeRange::Year,
        }
    }
}
