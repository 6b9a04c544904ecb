//! Voltbay CLI commands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::config::{connect, Session};
use voltbay_core::session::SessionEvent;
use voltbay_core::types::Listing;
use voltbay_http::types::{
    CreateChatRequest, CreateOrderRequest, ListingQuery, LoginRequest, PriceSuggestionRequest,
    RegisterRequest, SendMessageRequest, UpdateProfileRequest,
};

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Log out and clear the stored session
    Logout,
    /// Browse and manage listings
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Place and review orders
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Read and send chat messages
    #[command(subcommand)]
    Chats(ChatsCommand),
    /// Wallet balance and top-up
    #[command(subcommand)]
    Wallet(WalletCommand),
    /// Show or update the account profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Suggest an asking price for a battery
    SuggestPrice {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        year: u16,
        #[arg(long)]
        cycle_count: u32,
        #[arg(long)]
        capacity: String,
        #[arg(long)]
        condition: String,
        #[arg(long)]
        voltage: String,
    },
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// Browse listings with optional filters
    List {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        min_price: Option<i64>,
        #[arg(long)]
        max_price: Option<i64>,
        #[arg(long)]
        year: Option<u16>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one listing
    Show { id: String },
    /// Listings posted by the logged-in user
    Mine,
    /// Post a listing from a JSON draft file
    Post {
        #[arg(long)]
        file: PathBuf,
    },
    /// Update a listing from a JSON draft file
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a listing
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// Place an order for a listing
    Place {
        #[arg(long)]
        product_id: String,
        #[arg(long, default_value = "wallet")]
        payment_method: String,
        #[arg(long)]
        shipping_address: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        shipping_fee: Option<i64>,
    },
    /// Orders placed by the logged-in user
    Buyer,
    /// Orders received by the logged-in user
    Seller,
}

#[derive(Subcommand)]
pub enum ChatsCommand {
    /// List conversations
    List,
    /// Open the buyer/seller chat for a listing
    Open {
        #[arg(long)]
        listing_id: String,
        #[arg(long)]
        seller_id: String,
    },
    /// Mark a chat as read
    Read { chat_id: String },
    /// Send a message
    Send {
        chat_id: String,
        content: String,
    },
    /// Tail a chat, polling for new messages
    Watch {
        chat_id: String,
        /// Poll interval in seconds
        #[arg(long, default_value = "3")]
        interval: u64,
    },
}

#[derive(Subcommand)]
pub enum WalletCommand {
    /// Show the wallet balance
    Balance {
        /// Defaults to the logged-in user
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Create a payment-gateway top-up order
    TopUp {
        amount: i64,
        #[arg(long, default_value = "Voltbay wallet top-up")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show the logged-in user's profile
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
}

impl Commands {
    pub async fn execute(self, data_dir: Option<PathBuf>, base_url: Option<String>) -> Result<()> {
        let session = connect(data_dir, base_url).await?;

        match self {
            Commands::Login { email, password } => {
                session.client.login(LoginRequest { email, password }).await?;
                // Cache the profile so wallet/profile commands know who we are.
                if let Err(err) = session.client.profile().await {
                    warn!("logged in, but fetching the profile failed: {err}");
                }
                println!("Logged in.");
                Ok(())
            }
            Commands::Register {
                email,
                password,
                full_name,
                phone,
                address,
            } => {
                session
                    .client
                    .register(RegisterRequest {
                        email,
                        password,
                        full_name,
                        phone,
                        address,
                    })
                    .await?;
                println!("Account created and logged in.");
                Ok(())
            }
            Commands::Logout => match session.client.logout().await {
                Ok(()) => {
                    println!("Logged out.");
                    Ok(())
                }
                Err(err) => {
                    warn!("server sign-out failed: {err}");
                    println!("Local session cleared.");
                    Ok(())
                }
            },
            Commands::Products(command) => command.execute(&session).await,
            Commands::Orders(command) => command.execute(&session).await,
            Commands::Chats(command) => command.execute(&session).await,
            Commands::Wallet(command) => command.execute(&session).await,
            Commands::Profile(command) => command.execute(&session).await,
            Commands::SuggestPrice {
                brand,
                year,
                cycle_count,
                capacity,
                condition,
                voltage,
            } => {
                let suggestion = session
                    .client
                    .price_suggestion(&PriceSuggestionRequest {
                        brand,
                        year,
                        cycle_count,
                        capacity,
                        condition,
                        voltage,
                    })
                    .await?;
                print_json(&suggestion)
            }
        }
    }
}

impl ProductsCommand {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            ProductsCommand::List {
                brand,
                min_price,
                max_price,
                year,
                location,
                page,
                page_size,
            } => {
                let query = ListingQuery {
                    page,
                    page_size,
                    brand,
                    min_price,
                    max_price,
                    year,
                    location,
                    ..ListingQuery::default()
                };
                print_json(&session.client.list_listings(&query).await?)
            }
            ProductsCommand::Show { id } => print_json(&session.client.get_listing(&id).await?),
            ProductsCommand::Mine => print_json(&session.client.my_listings().await?),
            ProductsCommand::Post { file } => {
                let draft = read_listing_draft(&file).await?;
                print_json(&session.client.create_listing(&draft).await?)
            }
            ProductsCommand::Update { id, file } => {
                let draft = read_listing_draft(&file).await?;
                print_json(&session.client.update_listing(&id, &draft).await?)
            }
            ProductsCommand::Delete { id } => {
                session.client.delete_listing(&id).await?;
                println!("Deleted listing {id}");
                Ok(())
            }
        }
    }
}

impl OrdersCommand {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            OrdersCommand::Place {
                product_id,
                payment_method,
                shipping_address,
                notes,
                shipping_fee,
            } => {
                let order = session
                    .client
                    .place_order(&CreateOrderRequest {
                        product_id,
                        payment_method,
                        shipping_address,
                        notes,
                        shipping_fee,
                    })
                    .await?;
                print_json(&order)
            }
            OrdersCommand::Buyer => print_json(&session.client.buyer_orders().await?),
            OrdersCommand::Seller => print_json(&session.client.seller_orders().await?),
        }
    }
}

impl ChatsCommand {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            ChatsCommand::List => print_json(&session.client.list_chats().await?),
            ChatsCommand::Open {
                listing_id,
                seller_id,
            } => {
                let chat = session
                    .client
                    .open_chat(&CreateChatRequest {
                        listing_id,
                        seller_id,
                    })
                    .await?;
                print_json(&chat)
            }
            ChatsCommand::Read { chat_id } => {
                session.client.mark_chat_read(&chat_id).await?;
                println!("Marked chat {chat_id} as read");
                Ok(())
            }
            ChatsCommand::Send { chat_id, content } => {
                let message = session
                    .client
                    .send_chat_message(
                        &chat_id,
                        &SendMessageRequest {
                            content,
                            attachments: None,
                        },
                    )
                    .await?;
                print_json(&message)
            }
            ChatsCommand::Watch { chat_id, interval } => {
                watch_chat(session, &chat_id, Duration::from_secs(interval.max(1))).await
            }
        }
    }
}

impl WalletCommand {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            WalletCommand::Balance { user_id } => {
                let user_id = match user_id {
                    Some(id) => id,
                    None => session.client.profile().await?.id,
                };
                print_json(&session.client.wallet_for_user(&user_id).await?)
            }
            WalletCommand::TopUp {
                amount,
                description,
            } => {
                let url = session.client.create_top_up(amount, description).await?;
                println!("Open this URL to finish the payment:");
                println!("{url}");
                Ok(())
            }
        }
    }
}

impl ProfileCommand {
    async fn execute(self, session: &Session) -> Result<()> {
        match self {
            ProfileCommand::Show => print_json(&session.client.profile().await?),
            ProfileCommand::Update {
                full_name,
                phone,
                address,
                avatar_url,
            } => {
                let current = session.client.profile().await?;
                let updated = session
                    .client
                    .update_profile(
                        &current.id,
                        &UpdateProfileRequest {
                            full_name,
                            phone,
                            address,
                            avatar_url,
                        },
                    )
                    .await?;
                print_json(&updated)
            }
        }
    }
}

/// Tail a chat until interrupted or the session expires.
async fn watch_chat(session: &Session, chat_id: &str, interval: Duration) -> Result<()> {
    let mut events = session.watch.subscribe();
    let stream = session.client.watch_messages(chat_id, interval);
    futures::pin_mut!(stream);

    println!("Watching chat {chat_id} (Ctrl-C to stop)");
    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(Ok(message)) => {
                    let when = message
                        .created_at
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "-".into());
                    let who = message.sender_id.as_deref().unwrap_or("?");
                    println!("[{when}] {who}: {}", message.content);
                }
                Some(Err(err)) if err.is_auth_expired() => return Err(err.into()),
                Some(Err(err)) => warn!("message poll failed: {err}"),
                None => break,
            },
            event = events.recv() => {
                if let Ok(SessionEvent::Expired { reason }) = event {
                    bail!("session expired: {reason}");
                }
            }
        }
    }
    Ok(())
}

async fn read_listing_draft(file: &std::path::Path) -> Result<Listing> {
    let body = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read listing draft {}", file.display()))?;
    let draft: Listing = serde_json::from_str(&body)
        .with_context(|| format!("{} is not a valid listing draft", file.display()))?;
    Ok(draft)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
