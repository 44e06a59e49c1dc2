//! Command definitions and dispatch.

use std::{collections::HashMap, io::Write};

use clap::{Parser, Subcommand};
use entities::{Category, Location, Product, ShoppingList, Store, StoreType};
use serde::Serialize;
use shop_store::{ProductFilter, ShopStore, ShoppingListFilter, StoreFilter};
use shopping::{BUILTIN_CATEGORIES, ProductDraft, ShoppingService, StoreView};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "shoplist", version)]
#[command(about = "Manage shopping lists, products and stores")]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Insert the built-in categories into an empty database
    Seed,
    /// List categories with their keywords
    Categories,
    /// Suggest a category for a product name
    Suggest {
        /// Product name
        name: String,
    },
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Manage products
    #[command(subcommand)]
    Product(ProductCommand),
    /// Manage stores
    #[command(subcommand)]
    Store(StoreCommand),
    /// Manage shopping lists
    #[command(subcommand)]
    List(ListCommand),
}

#[derive(Debug, Subcommand)]
enum CategoryCommand {
    /// Add a category
    Add {
        name: String,
        /// Keyword used to suggest this category, repeatable
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,
        /// Unit suggested for its products
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Delete a category, leaving its products uncategorized
    Rm {
        /// Category name or id
        category: String,
    },
}

#[derive(Debug, Subcommand)]
enum ProductCommand {
    /// Add a product, suggesting its category from the name
    Add {
        name: String,
        /// Amount to buy, e.g. 1.5 or 1,5
        #[arg(short, long)]
        amount: Option<String>,
        /// Unit, e.g. kg or L
        #[arg(short, long)]
        unit: Option<String>,
        /// Category name or id
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List products
    List {
        /// Only products in this category (name or id)
        #[arg(short, long)]
        category: Option<String>,
        /// Only products without a category
        #[arg(long, conflicts_with = "category")]
        uncategorized: bool,
        /// Only products whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Rename a product
    Rename {
        /// Product name or id
        product: String,
        /// New name
        name: String,
    },
    /// Change the amount to buy
    Quantity {
        /// Product name or id
        product: String,
        amount: String,
        /// New unit; the current unit is kept when omitted
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Move a product to a category, or clear its category
    SetCategory {
        /// Product name or id
        product: String,
        /// Category name or id; omit to uncategorize
        category: Option<String>,
    },
    /// Delete a product and remove it from every list
    Rm {
        /// Product name or id
        product: String,
    },
}

#[derive(Debug, Subcommand)]
enum StoreCommand {
    /// Add a store arranged by its type's default categories
    Add {
        name: String,
        #[arg(short = 't', long = "type", default_value_t = StoreType::Grocery)]
        store_type: StoreType,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long)]
        address: Option<String>,
    },
    /// List stores with their category order
    List,
    /// Show every product available at a store
    View {
        /// Store name or id
        store: String,
    },
    /// Move a category within a store's order
    Move {
        /// Store name or id
        store: String,
        /// Current position, starting at 1
        from: usize,
        /// New position, starting at 1
        to: usize,
    },
    /// Append a category to a store's order
    AddCategory {
        /// Store name or id
        store: String,
        /// Category name or id
        category: String,
    },
    /// Remove a category from a store's order
    RmCategory {
        /// Store name or id
        store: String,
        /// Category name or id
        category: String,
    },
    /// Delete a store
    Rm {
        /// Store name or id
        store: String,
    },
}

#[derive(Debug, Subcommand)]
enum ListCommand {
    /// Create a shopping list
    Create { name: String },
    /// Show all shopping lists
    All,
    /// Rename a list
    Rename {
        /// List name or id
        list: String,
        /// New name
        name: String,
    },
    /// Add a product to a list
    Add {
        /// List name or id
        list: String,
        /// Product name or id
        product: String,
    },
    /// Remove a product from a list
    Remove {
        /// List name or id
        list: String,
        /// Product name or id
        product: String,
    },
    /// Check or uncheck a product on a list
    Toggle {
        /// List name or id
        list: String,
        /// Product name or id
        product: String,
    },
    /// Uncheck every product on a list
    Reset {
        /// List name or id
        list: String,
    },
    /// Show a list, optionally arranged for a store
    Show {
        /// List name or id
        list: String,
        /// Store name or id
        #[arg(short, long)]
        store: Option<String>,
    },
    /// Delete a list, keeping its products
    Rm {
        /// List name or id
        list: String,
    },
}

impl Cli {
    /// Runs the command against `service`, writing results to `out`.
    pub async fn execute<S: ShopStore>(
        self,
        service: &ShoppingService<S>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        let json = self.json;
        match self.command {
            Commands::Seed => {
                let created = service.seed_categories(BUILTIN_CATEGORIES).await?;
                if json {
                    write_json(out, &serde_json::json!({ "created": created }))?;
                } else if created == 0 {
                    writeln!(out, "Categories already present, nothing seeded")?;
                } else {
                    writeln!(out, "Seeded {created} categories")?;
                }
            }
            Commands::Categories => {
                let categories = service.categories().await?;
                if json {
                    write_json(out, &categories)?;
                } else {
                    for category in &categories {
                        writeln!(
                            out,
                            "{}  {} [{}]  {}",
                            category.id,
                            category.name,
                            category.default_unit.as_deref().unwrap_or("-"),
                            category.keywords().join(", ")
                        )?;
                    }
                }
            }
            Commands::Suggest { name } => {
                let suggestion = service.suggest_category(&name).await?;
                if json {
                    write_json(out, &suggestion)?;
                } else {
                    match suggestion {
                        Some(s) => writeln!(
                            out,
                            "{} (matched \"{}\", unit {})",
                            s.category_name,
                            s.matched_keyword,
                            s.default_unit.as_deref().unwrap_or("-")
                        )?,
                        None => writeln!(out, "No category matches \"{name}\"")?,
                    }
                }
            }
            Commands::Category(command) => command.execute(service, out, json).await?,
            Commands::Product(command) => command.execute(service, out, json).await?,
            Commands::Store(command) => command.execute(service, out, json).await?,
            Commands::List(command) => command.execute(service, out, json).await?,
        }
        Ok(())
    }
}

impl CategoryCommand {
    async fn execute<S: ShopStore>(
        self,
        service: &ShoppingService<S>,
        out: &mut impl Write,
        json: bool,
    ) -> anyhow::Result<()> {
        match self {
            CategoryCommand::Add {
                name,
                keywords,
                unit,
            } => {
                let category = service
                    .create_category(&name, &keywords, unit.as_deref())
                    .await?;
                if json {
                    write_json(out, &category)?;
                } else {
                    writeln!(out, "{}  {}", category.id, category.name)?;
                }
            }
            CategoryCommand::Rm { category } => {
                let category_id = resolve_category(service, &category).await?;
                service.delete_category(category_id).await?;
                write_deleted(out, json, "category", category_id)?;
            }
        }
        Ok(())
    }
}

impl ProductCommand {
    async fn execute<S: ShopStore>(
        self,
        service: &ShoppingService<S>,
        out: &mut impl Write,
        json: bool,
    ) -> anyhow::Result<()> {
        match self {
            ProductCommand::Add {
                name,
                amount,
                unit,
                category,
            } => {
                let mut draft = ProductDraft::new(name);
                draft.amount = amount;
                draft.unit = unit;
                if let Some(category) = category {
                    draft.category_id = Some(resolve_category(service, &category).await?);
                }

                let product = service.create_product(draft).await?;
                if json {
                    write_json(out, &product)?;
                } else {
                    let categories = service.categories().await?;
                    write_product(out, &product, &category_names(&categories))?;
                }
            }
            ProductCommand::List {
                category,
                uncategorized,
                search,
            } => {
                let category_id = match category {
                    Some(category) => Some(resolve_category(service, &category).await?),
                    None => None,
                };
                let products = service
                    .products(ProductFilter {
                        category_id,
                        uncategorized,
                        name_contains: search,
                        limit: None,
                    })
                    .await?;

                if json {
                    write_json(out, &products)?;
                } else {
                    let categories = service.categories().await?;
                    let names = category_names(&categories);
                    for product in &products {
                        write_product(out, product, &names)?;
                    }
                }
            }
            ProductCommand::Rename { product, name } => {
                let product_id = resolve_product(service, &product).await?;
                let product = service.rename_product(product_id, &name).await?;
                write_updated_product(service, out, json, &product).await?;
            }
            ProductCommand::Quantity {
                product,
                amount,
                unit,
            } => {
                let product_id = resolve_product(service, &product).await?;
                let product = service
                    .update_product_quantity(product_id, &amount, unit.as_deref())
                    .await?;
                write_updated_product(service, out, json, &product).await?;
            }
            ProductCommand::SetCategory { product, category } => {
                let product_id = resolve_product(service, &product).await?;
                let category_id = match category {
                    Some(category) => Some(resolve_category(service, &category).await?),
                    None => None,
                };
                let product = service.set_product_category(product_id, category_id).await?;
                write_updated_product(service, out, json, &product).await?;
            }
            ProductCommand::Rm { product } => {
                let product_id = resolve_product(service, &product).await?;
                service.delete_product(product_id).await?;
                write_deleted(out, json, "product", product_id)?;
            }
        }
        Ok(())
    }
}

impl StoreCommand {
    async fn execute<S: ShopStore>(
        self,
        service: &ShoppingService<S>,
        out: &mut impl Write,
        json: bool,
    ) -> anyhow::Result<()> {
        match self {
            StoreCommand::Add {
                name,
                store_type,
                lat,
                lon,
                address,
            } => {
                let mut location = Location::new(lat, lon);
                location.address = address;
                let store = service.create_store(&name, store_type, location).await?;
                if json {
                    write_json(out, &store)?;
                } else {
                    let categories = service.categories().await?;
                    write_store(out, &store, &category_names(&categories))?;
                }
            }
            StoreCommand::List => {
                let stores = service.stores(StoreFilter::default()).await?;
                if json {
                    write_json(out, &stores)?;
                } else {
                    let categories = service.categories().await?;
                    let names = category_names(&categories);
                    for store in &stores {
                        write_store(out, store, &names)?;
                    }
                }
            }
            StoreCommand::View { store } => {
                let store_id = resolve_store(service, &store).await?;
                let view = service.store_view(store_id).await?;
                if json {
                    write_json(out, &view)?;
                } else {
                    writeln!(out, "{}", view.store_name)?;
                    write_view(out, &view, None)?;
                }
            }
            StoreCommand::Move { store, from, to } => {
                let store_id = resolve_store(service, &store).await?;
                let (Some(from), Some(to)) = (from.checked_sub(1), to.checked_sub(1)) else {
                    anyhow::bail!("positions start at 1");
                };
                let store = service.move_store_category(store_id, from, to).await?;
                if json {
                    write_json(out, &store)?;
                } else {
                    let categories = service.categories().await?;
                    write_store(out, &store, &category_names(&categories))?;
                }
            }
            StoreCommand::AddCategory { store, category } => {
                let store_id = resolve_store(service, &store).await?;
                let category_id = resolve_category(service, &category).await?;
                let added = service.add_store_category(store_id, category_id).await?;
                if json {
                    write_json(out, &serde_json::json!({ "added": added }))?;
                } else if added {
                    writeln!(out, "Added")?;
                } else {
                    writeln!(out, "Already in the store")?;
                }
            }
            StoreCommand::RmCategory { store, category } => {
                let store_id = resolve_store(service, &store).await?;
                let category_id = resolve_category(service, &category).await?;
                let removed = service.remove_store_category(store_id, category_id).await?;
                if json {
                    write_json(out, &serde_json::json!({ "removed": removed }))?;
                } else if removed {
                    writeln!(out, "Removed")?;
                } else {
                    writeln!(out, "Not in the store")?;
                }
            }
            StoreCommand::Rm { store } => {
                let store_id = resolve_store(service, &store).await?;
                service.delete_store(store_id).await?;
                write_deleted(out, json, "store", store_id)?;
            }
        }
        Ok(())
    }
}

impl ListCommand {
    async fn execute<S: ShopStore>(
        self,
        service: &ShoppingService<S>,
        out: &mut impl Write,
        json: bool,
    ) -> anyhow::Result<()> {
        match self {
            ListCommand::Create { name } => {
                let list = service.create_list(&name).await?;
                if json {
                    write_json(out, &list)?;
                } else {
                    writeln!(out, "{}  {}", list.id, list.name())?;
                }
            }
            ListCommand::All => {
                let lists = service.lists(ShoppingListFilter::default()).await?;
                if json {
                    write_json(out, &lists)?;
                } else {
                    for list in &lists {
                        let progress = list.progress();
                        writeln!(
                            out,
                            "{}  {}  {}/{}",
                            list.id,
                            list.name(),
                            progress.checked,
                            progress.total
                        )?;
                    }
                }
            }
            ListCommand::Rename { list, name } => {
                let list_id = resolve_list(service, &list).await?;
                let list = service.rename_list(list_id, &name).await?;
                if json {
                    write_json(out, &list)?;
                } else {
                    writeln!(out, "{}  {}", list.id, list.name())?;
                }
            }
            ListCommand::Add { list, product } => {
                let list_id = resolve_list(service, &list).await?;
                let product_id = resolve_product(service, &product).await?;
                let added = service.add_product_to_list(list_id, product_id).await?;
                if json {
                    write_json(out, &serde_json::json!({ "added": added }))?;
                } else if added {
                    writeln!(out, "Added")?;
                } else {
                    writeln!(out, "Already on the list")?;
                }
            }
            ListCommand::Remove { list, product } => {
                let list_id = resolve_list(service, &list).await?;
                let product_id = resolve_product(service, &product).await?;
                let removed = service
                    .remove_product_from_list(list_id, product_id)
                    .await?;
                if json {
                    write_json(out, &serde_json::json!({ "removed": removed }))?;
                } else if removed {
                    writeln!(out, "Removed")?;
                } else {
                    writeln!(out, "Not on the list")?;
                }
            }
            ListCommand::Toggle { list, product } => {
                let list_id = resolve_list(service, &list).await?;
                let product_id = resolve_product(service, &product).await?;
                let checked = service.toggle_list_item(list_id, product_id).await?;
                if json {
                    write_json(out, &serde_json::json!({ "checked": checked }))?;
                } else if checked {
                    writeln!(out, "Checked")?;
                } else {
                    writeln!(out, "Unchecked")?;
                }
            }
            ListCommand::Reset { list } => {
                let list_id = resolve_list(service, &list).await?;
                let cleared = service.clear_checked(list_id).await?;
                if json {
                    write_json(out, &serde_json::json!({ "cleared": cleared }))?;
                } else {
                    writeln!(out, "Unchecked {cleared} products")?;
                }
            }
            ListCommand::Show { list, store } => {
                let list_id = resolve_list(service, &list).await?;
                match store {
                    Some(store) => {
                        let store_id = resolve_store(service, &store).await?;
                        let view = service.list_store_view(list_id, store_id).await?;
                        if json {
                            write_json(out, &view)?;
                        } else {
                            let list = service.list(list_id).await?;
                            writeln!(
                                out,
                                "{} at {} ({}/{})",
                                view.list_name,
                                view.view.store_name,
                                view.progress.checked,
                                view.progress.total
                            )?;
                            write_view(out, &view.view, Some(&list))?;
                            if !view.other_products.is_empty() {
                                writeln!(out, "Not sold here")?;
                                for product in &view.other_products {
                                    write_item(out, product, list.is_checked(product.id))?;
                                }
                            }
                        }
                    }
                    None => {
                        let list = service.list(list_id).await?;
                        if json {
                            write_json(out, &list)?;
                        } else {
                            write_list(service, out, &list).await?;
                        }
                    }
                }
            }
            ListCommand::Rm { list } => {
                let list_id = resolve_list(service, &list).await?;
                service.delete_list(list_id).await?;
                write_deleted(out, json, "list", list_id)?;
            }
        }
        Ok(())
    }
}

// =========================================================================
// Lookups
// =========================================================================

async fn resolve_category<S: ShopStore>(
    service: &ShoppingService<S>,
    key: &str,
) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(key) {
        return Ok(id);
    }
    let categories = service.categories().await?;
    pick_by_name(&categories, key, "category", |c| c.name.as_str(), |c| c.id)
}

async fn resolve_product<S: ShopStore>(
    service: &ShoppingService<S>,
    key: &str,
) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(key) {
        return Ok(id);
    }
    let products = service
        .products(ProductFilter {
            name_contains: Some(key.to_string()),
            ..Default::default()
        })
        .await?;
    pick_by_name(&products, key, "product", Product::name, |p| p.id)
}

async fn resolve_store<S: ShopStore>(
    service: &ShoppingService<S>,
    key: &str,
) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(key) {
        return Ok(id);
    }
    let stores = service.stores(StoreFilter::default()).await?;
    pick_by_name(&stores, key, "store", |s| s.name.as_str(), |s| s.id)
}

async fn resolve_list<S: ShopStore>(
    service: &ShoppingService<S>,
    key: &str,
) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(key) {
        return Ok(id);
    }
    let lists = service.lists(ShoppingListFilter::default()).await?;
    pick_by_name(&lists, key, "list", ShoppingList::name, |l| l.id)
}

/// Finds the single item whose name equals `key`, ignoring case.
fn pick_by_name<T>(
    items: &[T],
    key: &str,
    kind: &str,
    name: impl Fn(&T) -> &str,
    id: impl Fn(&T) -> Uuid,
) -> anyhow::Result<Uuid> {
    let key = key.trim();
    let mut matches = items
        .iter()
        .filter(|item| name(item).to_lowercase() == key.to_lowercase());
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(id(item)),
        (None, _) => anyhow::bail!("No {kind} named \"{key}\""),
        (Some(_), Some(_)) => anyhow::bail!("More than one {kind} named \"{key}\", use its id"),
    }
}

// =========================================================================
// Output
// =========================================================================

fn write_json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn write_deleted(out: &mut impl Write, json: bool, kind: &str, id: Uuid) -> anyhow::Result<()> {
    if json {
        write_json(out, &serde_json::json!({ "deleted": id }))
    } else {
        writeln!(out, "Deleted {kind} {id}")?;
        Ok(())
    }
}

async fn write_updated_product<S: ShopStore>(
    service: &ShoppingService<S>,
    out: &mut impl Write,
    json: bool,
    product: &Product,
) -> anyhow::Result<()> {
    if json {
        return write_json(out, product);
    }
    let categories = service.categories().await?;
    write_product(out, product, &category_names(&categories))
}

fn category_names(categories: &[Category]) -> HashMap<Uuid, &str> {
    categories.iter().map(|c| (c.id, c.name.as_str())).collect()
}

fn write_product(
    out: &mut impl Write,
    product: &Product,
    categories: &HashMap<Uuid, &str>,
) -> anyhow::Result<()> {
    let category = product
        .category_id
        .and_then(|id| categories.get(&id).copied())
        .unwrap_or("Uncategorized");
    writeln!(
        out,
        "{}  {}  {}  ({category})",
        product.id,
        product.name(),
        product.quantity
    )?;
    Ok(())
}

fn write_store(
    out: &mut impl Write,
    store: &Store,
    categories: &HashMap<Uuid, &str>,
) -> anyhow::Result<()> {
    writeln!(out, "{}  {} ({})", store.id, store.name, store.store_type)?;
    for (position, category_id) in store.category_order().iter().enumerate() {
        let name = categories.get(category_id).copied().unwrap_or("?");
        writeln!(out, "  {}. {name}", position + 1)?;
    }
    Ok(())
}

fn write_item(out: &mut impl Write, product: &Product, checked: bool) -> anyhow::Result<()> {
    let mark = if checked { "x" } else { " " };
    writeln!(out, "  [{mark}] {}  {}", product.name(), product.quantity)?;
    Ok(())
}

fn write_view(
    out: &mut impl Write,
    view: &StoreView,
    list: Option<&ShoppingList>,
) -> anyhow::Result<()> {
    for group in &view.groups {
        writeln!(out, "{}", group.category_name)?;
        for product in &group.products {
            match list {
                Some(list) => write_item(out, product, list.is_checked(product.id))?,
                None => writeln!(out, "  {}  {}", product.name(), product.quantity)?,
            }
        }
    }
    Ok(())
}

async fn write_list<S: ShopStore>(
    service: &ShoppingService<S>,
    out: &mut impl Write,
    list: &ShoppingList,
) -> anyhow::Result<()> {
    let progress = list.progress();
    writeln!(
        out,
        "{} ({}/{})",
        list.name(),
        progress.checked,
        progress.total
    )?;

    let products: HashMap<Uuid, Product> = service
        .products(ProductFilter::default())
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    for item in list.items() {
        if let Some(product) = products.get(&item.product_id) {
            write_item(out, product, item.is_checked)?;
        }
    }
    Ok(())
}
