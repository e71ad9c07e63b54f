use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use petshop_client::{PrefillOutcome, ShopClient, ShopClientError, StorefrontApi};
use petshop_core::cancel::CancelToken;
use petshop_core::catalog::format_price;
use petshop_core::chat::ChatState;
use petshop_core::detail::{ActionOutcome, DELETE_CONFIRM, DetailState, EditState, LoadOutcome};
use petshop_core::listing::{Listing, QnaFilter, ReviewFilter, answer_text, stars};
use petshop_core::models::{BoardSummary, Post, Product, ProductSummary};
use petshop_core::pagination::{ListOutcome, ListState};
use petshop_core::post_form::{Attachment, BoardType, EmailParts, PostDraft};
use petshop_core::record::{RecordKind, RecordRef};
use petshop_core::session::{SessionContext, SessionEvent};
use petshop_core::signup::{IdCheckState, PetGender, PetInput, PetType, SignupForm};
use petshop_core::{ApiError, UserNotice};
use serde::Serialize;

mod logging;
mod settings;
mod token_file;

use logging::init_logging;
use settings::Settings;
use token_file::FileTokenStore;

const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Debug, Parser)]
#[command(name = "petshop-cli", version, about = "CLI клиент для backend зоомагазина")]
struct Cli {
    /// Адрес сервера; по умолчанию `SHOP_API_URL`.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Печатать ответы как JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Signup {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        nickname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Интересующие питомцы: `dog`, `cat`.
        #[arg(long = "interest")]
        interests: Vec<PetType>,
        /// Свой питомец в виде `кличка:вид[:пол]`, например `Мурка:cat:F`.
        #[arg(long = "pet", value_parser = parse_pet)]
        pets: Vec<PetInput>,
    },
    /// Проверка, свободен ли логин.
    CheckId {
        #[arg(long)]
        user_id: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Профиль текущего пользователя.
    Me,
    /// Напомнить логин на почту.
    FindId {
        #[arg(long)]
        email: String,
    },
    /// Сбросить пароль.
    ResetPassword {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: String,
    },
    /// Доска объявлений (требует токен).
    Board {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Запись доски или событие.
    Show {
        /// `board` или `events`.
        #[arg(long, default_value = "board")]
        kind: RecordKind,
        #[arg(long)]
        id: i64,
    },
    /// Редактирование записи.
    ///
    /// Незаданные поля берутся из текущей версии записи.
    Edit {
        #[arg(long, default_value = "board")]
        kind: RecordKind,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Удаление записи. Без `--yes` ничего не удаляется.
    Delete {
        #[arg(long, default_value = "board")]
        kind: RecordKind,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Ответ администратора на пост доски.
    Answer {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        content: String,
    },
    /// Новый пост. Автор и почта берутся из профиля.
    Write {
        /// `NOTICE`, `QNA` или `FREE`.
        #[arg(long, default_value = "NOTICE")]
        board_type: BoardType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Другая почта вместо почты профиля.
        #[arg(long)]
        email: Option<String>,
        /// Другое имя автора.
        #[arg(long)]
        writer: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        mime: Option<String>,
    },
    /// События магазина.
    Events,
    /// Товары категории.
    Products {
        #[arg(long)]
        pet: String,
        #[arg(long)]
        sub: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Карточка товара.
    Product {
        #[arg(long)]
        id: i64,
    },
    /// Вопрос чат-ассистенту.
    Chat {
        #[arg(long)]
        message: String,
    },
    /// Подсказки ассистента для страницы.
    Suggest {
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Мои вопросы.
    Qna {
        #[arg(long)]
        waiting: bool,
        #[arg(long, conflicts_with = "waiting")]
        answered: bool,
    },
    /// Мои отзывы.
    Reviews {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: Option<u8>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let cli = Cli::parse();
    let config = settings.client_config(cli.server)?;

    let session = SessionContext::new(FileTokenStore::new(&settings.token_file));
    session.subscribe(|event| {
        if event == SessionEvent::Expired {
            tracing::warn!("server rejected the stored token, it was removed");
        }
    });
    let client = ShopClient::new(&config, session).context("не удалось создать HTTP-клиент")?;
    tracing::debug!(server = %config.base_url(), "client ready");

    match cli.command {
        Command::Signup {
            user_id,
            password,
            nickname,
            email,
            phone,
            address,
            interests,
            pets,
        } => {
            let mut form = SignupForm::default();
            form.set_user_id(user_id);
            form.password = password.clone();
            form.password_confirm = password;
            form.nickname = nickname;
            form.email = email;
            form.phone = phone.unwrap_or_default();
            form.default_address = address.unwrap_or_default();
            for pet_type in interests {
                form.toggle_interest(pet_type);
            }
            fill_pets(&mut form, pets);

            finish(client.register(&mut form).await)?;
        }
        Command::CheckId { user_id } => {
            let mut form = SignupForm::default();
            form.set_user_id(user_id);
            client.check_user_id(&mut form).await;
            match form.id_check() {
                IdCheckState::Checked { ok: true, message } => {
                    println!("Логин свободен. {message}");
                }
                IdCheckState::Checked { ok: false, message } => {
                    bail!("{message}");
                }
                IdCheckState::NotChecked => {}
            }
        }
        Command::Login { user_id, password } => {
            let session = client
                .login(&user_id, &password)
                .await
                .map_err(map_client_error)?;
            println!("Вход выполнен");
            println!("token: {}", session.access_token);
            if let Some(nickname) = &session.nickname {
                println!("nickname: {nickname}");
            }
        }
        Command::Logout => {
            client.logout().map_err(map_client_error)?;
            println!("Выход выполнен");
        }
        Command::Me => {
            let profile = client.profile().await.map_err(map_client_error)?;
            println!("user_id: {}", profile.user_id.unwrap_or_default());
            println!("nickname: {}", profile.nickname.unwrap_or_default());
            println!("email: {}", profile.email.unwrap_or_default());
        }
        Command::FindId { email } => {
            let message = client.find_id(&email).await.map_err(map_client_error)?;
            println!("{message}");
        }
        Command::ResetPassword { user_id, email } => {
            let message = client
                .reset_password(&user_id, &email)
                .await
                .map_err(map_client_error)?;
            println!("{message}");
        }
        Command::Board { page } => {
            let mut state = ListState::new(settings.page_size);
            state.set_page(page);
            list_result(client.load_board(&mut state, CancelToken::new()).await)?;
            if cli.json {
                print_json(state.items())?;
            } else {
                print_board(&state);
            }
        }
        Command::Show { kind, id } => {
            let state = load(&client, RecordRef { kind, id }).await?;
            if let Some(post) = state.post() {
                if cli.json {
                    print_json(post)?;
                } else {
                    print_post(post, &state);
                }
            }
        }
        Command::Edit {
            kind,
            id,
            title,
            content,
        } => {
            let mut state = EditState::new(RecordRef { kind, id });
            if let LoadOutcome::Failed { message, .. } = client.load_edit(&mut state).await {
                bail!(message);
            }
            if let Some(title) = title {
                state.set_title(title);
            }
            if let Some(content) = content {
                state.set_content(content);
            }
            finish(client.save_edit(&state).await)?;
        }
        Command::Delete { kind, id, yes } => {
            if !yes {
                bail!("{DELETE_CONFIRM} Повторите команду с --yes");
            }
            let state = load(&client, RecordRef { kind, id }).await?;
            if !state.access().can_delete {
                bail!("удалять запись может только автор или администратор");
            }
            finish(client.delete_record(&state).await)?;
        }
        Command::Answer { id, content } => {
            let mut state = load(&client, RecordRef::board(id)).await?;
            state.set_answer_draft(content);
            finish(client.submit_answer(&mut state).await)?;
        }
        Command::Write {
            board_type,
            title,
            content,
            email,
            writer,
            file,
            mime,
        } => {
            let mut draft = PostDraft::default();
            if client.prefill_post(&mut draft).await == PrefillOutcome::RedirectToLogin {
                bail!(login_hint());
            }
            draft.board_type = board_type;
            draft.title = title;
            draft.content = content;
            if let Some(writer) = writer {
                draft.writer = writer;
            }
            if let Some(email) = email {
                draft.email = EmailParts::split(&email)
                    .ok_or_else(|| anyhow!("почта должна быть в виде id@domain"))?;
            }
            if let Some(path) = file {
                draft.attachment = Some(read_attachment(path, mime)?);
            }
            finish(client.submit_post(&draft).await)?;
        }
        Command::Events => {
            let events = client.events().await.map_err(map_client_error)?;
            if cli.json {
                print_json(&events.items)?;
            } else {
                println!("Событий: {} (admin={})", events.items.len(), events.is_admin);
                for event in &events.items {
                    println!("- [{}] {} ({})", event.id, event.title, event.date);
                }
            }
        }
        Command::Products { pet, sub, page } => {
            let mut state = ListState::new(settings.page_size);
            state.set_page(page);
            let outcome = client
                .load_products(&mut state, &pet, sub.as_deref(), CancelToken::new())
                .await;
            list_result(outcome)?;
            if cli.json {
                print_json(state.items())?;
            } else {
                print_products(&state);
            }
        }
        Command::Product { id } => {
            let product = client.product(id).await.map_err(map_client_error)?;
            if cli.json {
                print_json(&product)?;
            } else {
                print_product(&product);
            }
        }
        Command::Chat { message } => {
            let mut chat = ChatState::default();
            chat.set_input(message);
            client.send_chat(&mut chat).await;
            if let Some(reply) = chat.transcript().messages().last() {
                println!("{}", reply.text);
            }
        }
        Command::Suggest { path } => {
            let suggestions = client
                .api()
                .chat_suggestions(&path)
                .await
                .map_err(|err| map_client_error(err.into()))?;
            if cli.json {
                print_json(&suggestions)?;
            } else {
                for reply in &suggestions {
                    let link = reply.link.as_deref().unwrap_or("-");
                    println!("- {} -> {} [{}]", reply.label, reply.answer, link);
                }
            }
        }
        Command::Qna { waiting, answered } => {
            let filter = match (waiting, answered) {
                (true, _) => QnaFilter::Waiting,
                (_, true) => QnaFilter::Answered,
                _ => QnaFilter::All,
            };
            let mut listing = Listing::default();
            client.load_my_qna(&mut listing).await;
            let entries = listing.filtered(|entry| filter.matches(entry));
            if cli.json {
                print_json(&entries)?;
            } else {
                println!("{}: {}", filter.label(), entries.len());
                for entry in entries {
                    println!("- [{}] {} / {} ({})", entry.id, entry.product_name, entry.title, entry.status);
                    println!("  {}", answer_text(entry));
                }
            }
        }
        Command::Reviews { rating } => {
            let filter = rating.map_or(ReviewFilter::All, ReviewFilter::Rating);
            let mut listing = Listing::default();
            client.load_my_reviews(&mut listing).await;
            let entries = listing.filtered(|entry| filter.matches(entry));
            if cli.json {
                print_json(&entries)?;
            } else {
                println!("{}: {}", filter.label(), entries.len());
                for entry in entries {
                    println!("- {} {} / {}", stars(entry.rating), entry.product_name, entry.title);
                }
            }
        }
    }

    Ok(())
}

async fn load(client: &ShopClient, record: RecordRef) -> Result<DetailState> {
    let mut state = DetailState::new(record);
    match client.load_record(&mut state, CancelToken::new()).await {
        LoadOutcome::Loaded | LoadOutcome::Stale => Ok(state),
        LoadOutcome::Failed { message, .. } => Err(anyhow!(message)),
    }
}

fn fill_pets(form: &mut SignupForm, pets: Vec<PetInput>) {
    if pets.is_empty() {
        return;
    }
    form.toggle_has_pet();
    for _ in 1..pets.len() {
        form.add_pet();
    }
    for (index, pet) in pets.into_iter().enumerate() {
        if let Some(slot) = form.pet_mut(index) {
            *slot = pet;
        }
    }
}

fn parse_pet(raw: &str) -> Result<PetInput, String> {
    let mut parts = raw.split(':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("pet name is empty".to_string());
    }
    let pet_type = parts
        .next()
        .ok_or_else(|| "expected name:type[:gender]".to_string())?
        .parse::<PetType>()?;
    let gender = parts.next().map(str::parse::<PetGender>).transpose()?;

    Ok(PetInput {
        name: name.to_string(),
        pet_type: Some(pet_type),
        gender,
        ..PetInput::default()
    })
}

fn read_attachment(path: PathBuf, mime: Option<String>) -> Result<Attachment> {
    let bytes = fs::read(&path).with_context(|| format!("не удалось прочитать {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("у файла нет имени: {}", path.display()))?;

    Ok(Attachment {
        file_name,
        mime_type: mime.unwrap_or_else(|| DEFAULT_MIME.to_string()),
        bytes,
    })
}

fn finish(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Succeeded {
            message,
            navigate_to,
            ..
        } => {
            println!("{message}");
            if let Some(route) = navigate_to {
                tracing::debug!(%route, "web client would navigate");
            }
            Ok(())
        }
        ActionOutcome::Failed(message) => Err(anyhow!(message)),
        ActionOutcome::RedirectToLogin(message) => Err(anyhow!("{message}. {}", login_hint())),
    }
}

fn list_result(outcome: ListOutcome) -> Result<()> {
    match outcome {
        ListOutcome::Loaded | ListOutcome::ResetToFirstPage | ListOutcome::Stale => Ok(()),
        ListOutcome::RedirectToLogin => Err(anyhow!(login_hint())),
        ListOutcome::Failed(message) => Err(anyhow!(message)),
    }
}

fn login_hint() -> &'static str {
    "требуется авторизация: выполните `petshop-cli login ...`"
}

fn map_client_error(err: ShopClientError) -> anyhow::Error {
    let message = match err {
        ShopClientError::Api(ApiError::Unauthorized) => login_hint().to_string(),
        ShopClientError::Api(err) => match err.notice() {
            UserNotice::Inline(message) => format!("некорректный запрос: {message}"),
            notice => notice.message().to_string(),
        },
        ShopClientError::Config(message) => format!("некорректная конфигурация: {message}"),
        ShopClientError::Storage(err) => format!("ошибка хранения токена: {err}"),
        ShopClientError::InvalidInput(message) => message,
    };
    anyhow::anyhow!(message)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value).context("не удалось сериализовать ответ")?;
    println!("{raw}");
    Ok(())
}

fn print_board(state: &ListState<BoardSummary>) {
    let window = state.window();
    println!(
        "Страница {} из {} (кнопки {}..={})",
        window.page, window.total_pages, window.start_page, window.end_page
    );
    for row in state.items() {
        println!(
            "- [{}] {} ({}, {}, просмотров {})",
            row.id, row.title, row.writer, row.date, row.view_count
        );
    }
}

fn print_post(post: &Post, state: &DetailState) {
    let access = state.access();
    println!("[{}] {}", post.id, post.title);
    println!("category: {}", post.category);
    println!("writer: {}", post.writer);
    println!("date: {}", post.date);
    println!("views: {}", post.view_count);
    if let Some(img) = &post.img_url {
        println!("image: {img}");
    }
    println!();
    println!("{}", post.content);
    for answer in &post.answers {
        println!();
        println!("ответ {} ({}): {}", answer.writer, answer.date, answer.content);
    }
    if access.can_edit || access.can_answer {
        println!();
        println!(
            "доступно: edit={} delete={} answer={}",
            access.can_edit, access.can_delete, access.can_answer
        );
    }
}

fn print_products(state: &ListState<ProductSummary>) {
    let window = state.window();
    println!("Страница {} из {}", window.page, window.total_pages);
    for item in state.items() {
        println!("- [{}] {} {}", item.id, item.name, format_price(item.price));
    }
}

fn print_product(product: &Product) {
    println!("[{}] {}", product.id, product.name);
    println!("price: {}", format_price(product.price));
    if let Some(pet) = &product.pet {
        println!("pet: {pet}");
    }
    if let Some(sub) = &product.sub_category {
        println!("category: {sub}");
    }
    println!();
    println!("{}", product.description);
}
