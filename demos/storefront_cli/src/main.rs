// storefront_cli/src/main.rs

//! Terminal front end for the cart session store.
//!
//! Each invocation loads the carts, runs one command and prints the
//! resulting cart. The bearer token lives in the file named by
//! `STOREFRONT_TOKEN_PATH`, so `login` once and the other commands reuse it.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storefront_cart::{
  CartId, CartItemId, CartSessionStore, CartSnapshot, FileTokenStore, InventoryId, Quantity, StoreConfig, TokenStore,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storefront-cli", version, about = "Manage pharmacy storefront carts from the terminal")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Store a bearer token for later commands.
  Login {
    #[arg(long)]
    token: String,
  },
  /// Forget the stored token.
  Logout,
  #[command(flatten)]
  Cart(CartCommand),
}

/// Commands that load the carts first and print them afterwards.
#[derive(Subcommand, Debug)]
enum CartCommand {
  /// Show every cart of the signed-in user.
  Carts,
  /// Add an inventory record to its branch cart.
  Add {
    inventory_id: i64,
    #[arg(default_value_t = 1)]
    quantity: i64,
  },
  /// Set the quantity of a cart item.
  Update { cart_item_id: i64, quantity: i64 },
  /// Remove a cart item.
  Remove { cart_item_id: i64 },
  /// Show the carts with the given one selected.
  Select { cart_id: i64 },
  /// Remove every item of the selected (or given) cart.
  Clear {
    #[arg(long)]
    cart: Option<i64>,
  },
  /// Proceed to checkout with the selected (or given) cart.
  Checkout {
    #[arg(long)]
    cart: Option<i64>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_target(false)
    .init();

  let cli = Cli::parse();
  let config = StoreConfig::from_env().context("loading storefront configuration")?;

  match cli.command {
    Command::Login { token } => {
      FileTokenStore::new(config.token_path.clone())
        .save(&token)
        .context("saving bearer token")?;
      println!("Token saved to {}.", config.token_path.display());
      Ok(())
    }
    Command::Logout => {
      let store = CartSessionStore::from_config(&config)?;
      store.logout();
      println!("Logged out.");
      Ok(())
    }
    Command::Cart(command) => run_cart_command(&config, command).await,
  }
}

async fn run_cart_command(config: &StoreConfig, command: CartCommand) -> anyhow::Result<()> {
  let store = CartSessionStore::from_config(config)?;
  store.subscribe(|snapshot| {
    let summary = snapshot.summary();
    tracing::debug!(
      carts = summary.cart_count,
      items = summary.item_count,
      loading = snapshot.loading,
      "Cart badge updated."
    );
  });

  store.fetch_carts().await?;

  match command {
    CartCommand::Carts => {}
    CartCommand::Add { inventory_id, quantity } => {
      let receipt = store.add_to_cart(InventoryId(inventory_id), Quantity::new(quantity)?).await?;
      if let Some(cart_item_id) = receipt.cart_item_id {
        println!("Added as cart item {cart_item_id}.");
      }
    }
    CartCommand::Update { cart_item_id, quantity } => {
      store
        .update_cart_item(CartItemId(cart_item_id), Quantity::new(quantity)?)
        .await?;
    }
    CartCommand::Remove { cart_item_id } => {
      store.remove_cart_item(CartItemId(cart_item_id)).await?;
    }
    CartCommand::Select { cart_id } => {
      store.select_cart(CartId(cart_id))?;
    }
    CartCommand::Clear { cart } => {
      if let Some(cart_id) = cart {
        store.select_cart(CartId(cart_id))?;
      }
      let removed = store.clear_cart().await?;
      println!("Removed {removed} item(s).");
    }
    CartCommand::Checkout { cart } => {
      if let Some(cart_id) = cart {
        store.select_cart(CartId(cart_id))?;
      }
      let cart_id = store.proceed_to_checkout()?;
      println!("Checking out cart {cart_id}.");
    }
  }

  print_carts(&store.snapshot());
  Ok(())
}

fn print_carts(snapshot: &CartSnapshot) {
  if snapshot.carts.is_empty() {
    println!("No carts.");
    return;
  }
  for cart in &snapshot.carts {
    let marker = if snapshot.selected_cart_id == Some(cart.cart_id) { "*" } else { " " };
    println!(
      "{marker} cart {} ({})",
      cart.cart_id,
      cart.branch_name().unwrap_or("no items")
    );
    for item in &cart.items {
      println!(
        "    #{:<6} {:<32} {:>3} {:<8} {:>12}",
        item.cart_item_id,
        item.product_name,
        item.quantity,
        item.unit,
        money(item.line_total())
      );
    }
  }
  let summary = snapshot.summary();
  println!(
    "{} item(s) in {} cart(s); selected total {}",
    summary.item_count,
    summary.cart_count,
    money(summary.selected_total)
  );
}

fn money(amount: Decimal) -> String {
  format!("Rp {}", amount.round_dp(2))
}
