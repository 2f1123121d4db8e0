use actix_web::{web, App, HttpServer};
use invoice_desk::auth::StaticCredentialGate;
use invoice_desk::cache::InMemoryRouteCache;
use invoice_desk::http;
use invoice_desk::service::InvoiceService;
use invoice_desk::{CustomerStore, InvoiceStore};
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("\n╔════════════════════════════════════════════╗");
    println!("║   invoice-desk {}                        ║", invoice_desk::VERSION);
    println!("╚════════════════════════════════════════════╝\n");

    // ========================================================================
    // Store setup (Postgres when the feature is on, else seeded in-memory)
    // ========================================================================

    #[cfg(feature = "postgres")]
    let store = {
        let database_url =
            env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env file");

        println!("📦 Connecting to PostgreSQL...");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to create database pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        println!("✅ Database ready");
        Arc::new(invoice_desk::store::PgStore::new(pool))
    };

    #[cfg(not(feature = "postgres"))]
    let store = {
        println!("📦 Using in-memory store with demo data");
        let store = Arc::new(invoice_desk::store::InMemoryStore::new());
        seed_demo(&store).await;
        store
    };

    // ========================================================================
    // Server configuration
    // ========================================================================

    let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("SERVER_PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("{}:{}", host, port);

    println!("\n🚀 Starting server at http://{}\n", bind_address);
    println!("🔗 Available endpoints:");
    println!("   ├─ GET  /health");
    println!("   ├─ POST /login");
    println!("   ├─ GET  /dashboard/invoices");
    println!("   ├─ POST /dashboard/invoices");
    println!("   ├─ GET  /dashboard/invoices/new");
    println!("   ├─ GET  /dashboard/invoices/{{id}}/edit");
    println!("   ├─ POST /dashboard/invoices/{{id}}/edit");
    println!("   └─ POST /dashboard/invoices/{{id}}/delete\n");

    serve(store, bind_address).await
}

async fn serve<S>(store: Arc<S>, bind_address: String) -> std::io::Result<()>
where
    S: InvoiceStore + CustomerStore + 'static,
{
    // Cached list views expire after five minutes even without a write
    let service = InvoiceService::new(store, InMemoryRouteCache::new())
        .with_list_ttl(Some(Duration::from_secs(300)));
    let service = web::Data::new(service);
    let gate = web::Data::new(StaticCredentialGate::from_env());

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(gate.clone())
            .configure(http::configure::<S, InMemoryRouteCache, StaticCredentialGate>)
    })
    .bind(&bind_address)?
    .run()
    .await
}

#[cfg(not(feature = "postgres"))]
async fn seed_demo(store: &invoice_desk::store::InMemoryStore) {
    use invoice_desk::{Customer, Invoice, InvoiceStatus};

    let customers = [
        ("cus_evil_rabbit", "Evil Rabbit", "evil@rabbit.com"),
        ("cus_delba", "Delba de Oliveira", "delba@oliveira.com"),
        ("cus_lee", "Lee Robinson", "lee@robinson.com"),
        ("cus_amy", "Amy Burns", "amy@burns.com"),
    ];

    for (id, name, email) in customers {
        store.add_customer(Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        });
    }

    let invoices = [
        ("cus_evil_rabbit", 15_795, InvoiceStatus::Pending, 0),
        ("cus_delba", 20_348, InvoiceStatus::Paid, 4),
        ("cus_lee", 3_040, InvoiceStatus::Paid, 11),
        ("cus_amy", 44_800, InvoiceStatus::Pending, 21),
    ];

    for (customer_id, amount, status, days_ago) in invoices {
        let mut invoice = Invoice::new(customer_id.to_string(), amount, status);
        invoice.date = invoice.date - chrono::Duration::days(days_ago);
        store
            .insert(&invoice)
            .await
            .expect("Failed to seed demo invoice");
    }

    log::info!("seeded {} demo invoices", invoices.len());
}
