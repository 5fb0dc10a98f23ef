//! Snapshot listing.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use filecards_core::error::AppError;
use filecards_core::types::{ItemFilter, ItemId, KindFilter, SortDirection, SortKey, SortSpec};
use filecards_entity::FileSystemItem;
use filecards_tree::{ItemQuery, TreeSnapshot, TreeStore};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// JSON file holding an array of items
    #[arg(short, long)]
    pub snapshot: String,
    /// Folder to list (omit for the top level)
    #[arg(long)]
    pub folder: Option<String>,
    /// Case-insensitive name filter
    #[arg(long)]
    pub search: Option<String>,
    /// Restrict to one kind
    #[arg(long, value_enum, default_value = "all")]
    pub kind: KindArg,
    /// List the trash instead of a folder
    #[arg(long)]
    pub trashed: bool,
    /// Sort key
    #[arg(long, value_enum, default_value = "name")]
    pub sort: SortArg,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Include every descendant of the listed folder
    #[arg(short, long)]
    pub recursive: bool,
}

/// Kind filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Folders and documents
    All,
    /// Folders only
    Folders,
    /// Documents only
    Documents,
}

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// By name
    Name,
    /// By creation time
    Created,
    /// By last update
    Updated,
    /// By size
    Size,
}

/// Item display row
#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    /// Item ID
    id: String,
    /// Kind
    kind: String,
    /// Name
    name: String,
    /// Live children (folders)
    items: String,
    /// Size in bytes (documents)
    size: String,
    /// Path from the top level
    path: String,
}

impl ItemRow {
    fn new(tree: &TreeSnapshot, item: &FileSystemItem) -> Self {
        let path = path_of(tree, item.id());
        let (items, size) = match item {
            FileSystemItem::Folder(folder) => (folder.items.to_string(), String::new()),
            FileSystemItem::Document(document) => (String::new(), document.size.to_string()),
        };
        Self {
            id: item.id().to_string(),
            kind: item.kind().to_string(),
            name: item.name().to_string(),
            items,
            size,
            path,
        }
    }
}

fn path_of(tree: &TreeSnapshot, id: &ItemId) -> String {
    tree.get_path(id)
        .iter()
        .map(|step| step.name())
        .collect::<Vec<_>>()
        .join("/")
}

/// Execute the tree command
pub async fn execute(args: &TreeArgs, format: OutputFormat) -> Result<(), AppError> {
    let tree = TreeStore::with_items(super::read_snapshot(&args.snapshot).await?);
    let folder = args.folder.as_deref().map(ItemId::from);

    if let Some(folder) = &folder {
        if !tree.is_folder(folder) {
            return Err(AppError::not_found(format!("Folder {folder} not found")));
        }
    }

    let query = ItemQuery {
        filter: ItemFilter {
            search: args.search.clone(),
            kind: match args.kind {
                KindArg::All => KindFilter::All,
                KindArg::Folders => KindFilter::Folders,
                KindArg::Documents => KindFilter::Documents,
            },
            trashed: args.trashed,
            pinned_only: false,
        },
        sort: SortSpec {
            key: match args.sort {
                SortArg::Name => SortKey::Name,
                SortArg::Created => SortKey::CreatedAt,
                SortArg::Updated => SortKey::UpdatedAt,
                SortArg::Size => SortKey::Size,
            },
            direction: if args.desc { SortDirection::Desc } else { SortDirection::Asc },
            ..SortSpec::default()
        },
    };

    let mut ids = tree.visible_items(folder.as_ref(), &query);
    if args.recursive && !args.trashed {
        ids = ids
            .into_iter()
            .flat_map(|id| {
                let below = tree.descendants(&id);
                std::iter::once(id).chain(below)
            })
            .collect();
    }

    let rows: Vec<ItemRow> = ids
        .iter()
        .filter_map(|id| tree.get(id))
        .filter(|item| args.trashed || item.is_active())
        .map(|item| ItemRow::new(&tree, item))
        .collect();

    let heading = if args.trashed {
        "Trash".to_string()
    } else {
        match &folder {
            Some(folder) => path_of(&tree, folder),
            None => "/".to_string(),
        }
    };
    output::print_listing(&heading, &rows, format);
    Ok(())
}
