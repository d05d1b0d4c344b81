use std::error::Error;
use std::io::Write;

use meibo::{
    application::{auth, session::Session},
    domain::customer::{Customer, CustomerId, CustomerRepository},
    infrastructure::{memory::MemoryCustomerRepository, rest::RestCustomerRepository},
    Backend, MeiboConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info, Level};

static DEFAULT_REST_URL: &str = "http://localhost:4000";
static PAGE_SIZE: usize = 10;

#[tokio::main]
async fn main() {
    let config = match MeiboConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            config
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定の読み込みに失敗しました: {}", error);
            MeiboConfig::default()
        }
    };
    let result = match config.store.backend {
        Backend::Memory => {
            info!("インメモリストアを使用します");
            run(Session::new(MemoryCustomerRepository::with_customers(
                seed(),
            )))
            .await
        }
        Backend::Rest => {
            let url = config
                .store
                .url
                .unwrap_or_else(|| DEFAULT_REST_URL.to_owned());
            info!("RESTバックエンドを使用します: {}", url);
            run(Session::new(RestCustomerRepository::new(url))).await
        }
    };
    if let Err(error) = result {
        error!("アプリケーションエラー: {}", error);
    }
}

/// モックストアの初期データ
fn seed() -> Vec<Customer> {
    [
        (1, "Ichiro Tanaka", "ichiro@example.com", "hibari"),
        (2, "Hanako Suzuki", "hanako@example.com", "sakura"),
        (3, "Jiro Takahashi", "jiro@example.com", "tsubame"),
    ]
    .into_iter()
    .filter_map(|(id, name, email, password)| {
        Customer::new(
            CustomerId::from(id),
            name.to_owned(),
            email.to_owned(),
            password.to_owned(),
        )
        .ok()
    })
    .collect()
}

async fn run<R>(mut session: Session<R>) -> Result<(), Box<dyn Error>>
where
    R: CustomerRepository,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    login(&mut lines).await?;

    if let Err(error) = session.refresh().await {
        error!("顧客一覧の取得に失敗しました: {}", error);
        println!("Failed to fetch customers: {}", error);
    }
    println!();
    println!("Customer List");
    render(&session);
    help();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let line = line.trim();
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();
        match command {
            "" => {}
            "help" => help(),
            "list" | "refresh" => {
                if let Err(error) = session.refresh().await {
                    error!("顧客一覧の取得に失敗しました: {}", error);
                    println!("Failed to fetch customers: {}", error);
                }
                render(&session);
            }
            "search" => {
                session.search(rest);
                render(&session);
            }
            "clear" => {
                session.search("");
                render(&session);
            }
            "select" => match rest.parse::<u64>() {
                Ok(id) => {
                    session.toggle_select(CustomerId::from(id));
                    render(&session);
                }
                Err(_) => println!("select takes a numeric id"),
            },
            "page" => match rest.parse::<usize>() {
                Ok(number) => render_page(&session, number),
                Err(_) => println!("page takes a page number"),
            },
            "add" => add_flow(&mut session, &mut lines).await?,
            "update" => update_flow(&mut session, &mut lines).await?,
            "delete" => delete_flow(&mut session, &mut lines).await?,
            "quit" | "exit" => break,
            other => println!("Unknown command: {} (try 'help')", other),
        }
    }
    Ok(())
}

/// 管理者ログイン(成功するまで繰り返す)
async fn login(lines: &mut Lines<BufReader<Stdin>>) -> Result<(), Box<dyn Error>> {
    println!("Admin Login");
    loop {
        let email = prompt(lines, "Email: ").await?;
        let password = prompt(lines, "Password: ").await?;
        match auth::authenticate(&email, &password) {
            Ok(user) => {
                info!("管理者がログインしました: {}", user.email);
                println!("Welcome, {}.", user.name);
                return Ok(());
            }
            Err(error) => println!("{}", error),
        }
    }
}

async fn add_flow<R>(
    session: &mut Session<R>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn Error>>
where
    R: CustomerRepository,
{
    println!("Add Customer");
    let name = prompt(lines, "Name: ").await?;
    let email = prompt(lines, "Email: ").await?;
    let password = prompt(lines, "Password: ").await?;
    match session.add(name, email, password).await {
        Ok(id) => {
            println!("Customer {} added.", id);
            render(session);
        }
        Err(error) => {
            error!("顧客の追加に失敗しました: {}", error);
            println!("{}", error);
        }
    }
    Ok(())
}

async fn update_flow<R>(
    session: &mut Session<R>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn Error>>
where
    R: CustomerRepository,
{
    let current = match session.selected_customer() {
        Some(current) => current.clone(),
        None => {
            println!("Customer not found");
            return Ok(());
        }
    };
    println!("Update Customer {}", current.id());
    // 空欄は現在の値を保持する
    let name = prompt_default(lines, "Name", current.name()).await?;
    let email = prompt_default(lines, "Email", current.email()).await?;
    let password = prompt_default(lines, "Password", current.password()).await?;
    match session.update(name, email, password).await {
        Ok(()) => {
            println!("Customer updated.");
            render(session);
        }
        Err(error) => {
            error!("顧客の更新に失敗しました: {}", error);
            println!("{}", error);
        }
    }
    Ok(())
}

async fn delete_flow<R>(
    session: &mut Session<R>,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn Error>>
where
    R: CustomerRepository,
{
    let customer = match session.selected_customer() {
        Some(customer) => customer.clone(),
        None => {
            println!("Customer not found");
            return Ok(());
        }
    };
    println!("Delete Customer");
    println!("Name: {}", customer.name());
    println!("Email: {}", customer.email());
    println!("Password: {}", customer.password());
    let answer = prompt(lines, "Confirm delete? (y/N): ").await?;
    if answer.eq_ignore_ascii_case("y") {
        match session.delete_selected().await {
            Ok(()) => {
                println!("Customer deleted.");
                render(session);
            }
            Err(error) => {
                error!("顧客の削除に失敗しました: {}", error);
                println!("{}", error);
            }
        }
    } else {
        println!("Cancelled.");
        render(session);
    }
    Ok(())
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> Result<String, Box<dyn Error>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let line = lines.next_line().await?.ok_or("standard input closed")?;
    Ok(line.trim().to_owned())
}

async fn prompt_default(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
    default: &str,
) -> Result<String, Box<dyn Error>> {
    let input = prompt(lines, &format!("{} [{}]: ", label, default)).await?;
    if input.is_empty() {
        Ok(default.to_owned())
    } else {
        Ok(input)
    }
}

/// 顧客一覧テーブルを表示する
fn render<R>(session: &Session<R>)
where
    R: CustomerRepository,
{
    render_rows(session, session.customers());
    println!("Showing {} of {} customers", session.visible(), session.total());
}

fn render_page<R>(session: &Session<R>, number: usize)
where
    R: CustomerRepository,
{
    let rows = session.page(number, PAGE_SIZE);
    render_rows(session, rows);
    println!(
        "Page {} ({} per page, {} of {} customers)",
        number,
        PAGE_SIZE,
        rows.len(),
        session.visible()
    );
}

fn render_rows<R>(session: &Session<R>, rows: &[Customer])
where
    R: CustomerRepository,
{
    let selected = session.selected_customer().map(Customer::id);
    println!(
        "{:<2} {:<6} {:<20} {:<28} {:<16}",
        "", "ID", "Name", "Email", "Password"
    );
    for customer in rows {
        let marker = if selected == Some(customer.id()) {
            ">"
        } else {
            ""
        };
        println!(
            "{:<2} {:<6} {:<20} {:<28} {:<16}",
            marker,
            customer.id(),
            customer.name(),
            customer.email(),
            customer.password()
        );
    }
    if session.visible() == 0 && session.total() > 0 {
        println!("No customers found matching your search criteria.");
    }
}

fn help() {
    println!("Commands:");
    println!("  list             refresh the customer list");
    println!("  search <term>    filter by id, name, email, or password");
    println!("  clear            clear the search filter");
    println!("  select <id>      select or deselect a row");
    println!("  page <n>         show one page of the current list");
    println!("  add              add a customer");
    println!("  update           update the selected customer");
    println!("  delete           delete the selected customer");
    println!("  quit             exit");
}
