//! Buy a Coffee (dry run)
//!
//! Walks through the tip form without a real wallet: loads the token list,
//! reads the balance of a watch-only account, and shows the clause a wallet
//! would be asked to sign. The demo session declines every request.
//!
//! Run: cargo run --example buy_coffee -- 0.5 [TOKEN_ADDRESS]
//!
//! Environment variables:
//!   THOR_NETWORK / THOR_NODE_URL - Network preset or node URL (default: test)
//!   COFFEE_RECIPIENT - Address receiving the tip
//!   COFFEE_ACCOUNT - Watch-only account whose balance is shown
//!   RUST_LOG - Log filter (e.g. "coffee_kit=debug")

use alloy_primitives::Address;
use coffee_kit::*;
use tracing_subscriber::EnvFilter;

/// Knows an account but never signs.
struct WatchOnly(Option<Address>);

impl WalletSession for WatchOnly {
    fn connected_account(&self) -> Option<Address> {
        self.0
    }

    fn sign(&self, request: SignRequest) -> SignFuture<'_> {
        Box::pin(async move {
            for clause in &request.clauses {
                println!("Wallet asked to sign for {}:", request.signer);
                println!("  to:      {}", clause.to());
                println!("  value:   {}", clause.value());
                println!("  data:    {}", clause.data());
                println!("  comment: {}", clause.comment().unwrap_or_default());
            }
            Err(SignerError::Rejected("dry run".to_string()))
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let amount = args.next().unwrap_or_else(|| "1".to_string());
    let token = args.next().unwrap_or_default();

    let account = std::env::var("COFFEE_ACCOUNT")
        .ok()
        .map(parse_address)
        .transpose()?;

    let coffee = Coffee::from_env_builder()?
        .session(WatchOnly(account))
        .build();

    println!("=== {} ===", coffee.app().title);
    println!("{}\n", coffee.app().description);
    println!("Node: {} ({})", coffee.node_url(), coffee.network());

    let mut form = CoffeeForm::new(coffee);
    form.refresh().await;

    println!("\nTokens:");
    for option in form.selector().options() {
        let value = if option.value.is_empty() { "(native)" } else { option.value.as_str() };
        println!("  {:<8} {}", option.label, value);
    }

    if !token.is_empty() {
        form.select_token(&token)?;
    }
    if form.refresh_balance().await.is_some() {
        println!("\nBalance: {} {}", form.balance(), form.symbol());
    }

    form.set_amount(amount);
    println!("\n[{}]", form.send_label());

    if !form.can_send() {
        println!("{}", form.status_text());
        return Ok(());
    }

    match form.send().await {
        Ok(Some(txid)) => {
            println!("Sent {txid}");
            println!("{}", form.wait().await.status_text());
        }
        Ok(None) => println!("Nothing sent: no recipient configured (set COFFEE_RECIPIENT)"),
        Err(_) => println!("Error: {}", form.error().unwrap_or_default()),
    }

    Ok(())
}
