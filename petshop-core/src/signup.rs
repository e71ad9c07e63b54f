//! Формы входа, регистрации и восстановления аккаунта.
//!
//! Проверяется только наличие полей и совпадение паролей, остальное решает сервер.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::detail::ActionOutcome;
use crate::error::{ApiError, ApiResult};
use crate::models::{IdCheck, ServerMessage};

/// Куда уходим после регистрации.
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Вид питомца.
pub enum PetType {
    /// Собака.
    Dog,
    /// Кошка.
    Cat,
}

impl PetType {
    /// Все виды в порядке переключателей.
    pub const ALL: [PetType; 2] = [PetType::Dog, PetType::Cat];

    /// Значение для сервера.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }

    /// Подпись.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dog => "Собака",
            Self::Cat => "Кошка",
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            other => Err(format!("unknown pet type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Пол питомца.
pub enum PetGender {
    /// Самец.
    #[serde(rename = "M")]
    Male,
    /// Самка.
    #[serde(rename = "F")]
    Female,
    /// Не указан / кастрирован.
    #[serde(rename = "N")]
    Neutral,
}

impl PetGender {
    /// Значение для сервера.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Neutral => "N",
        }
    }
}

impl FromStr for PetGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Self::Male),
            "F" => Ok(Self::Female),
            "N" => Ok(Self::Neutral),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Питомец в форме регистрации.
pub struct PetInput {
    /// Кличка.
    pub name: String,
    /// Вид.
    pub pet_type: Option<PetType>,
    /// Пол.
    pub gender: Option<PetGender>,
    /// Дата рождения как ввёл пользователь.
    pub birthday: String,
    /// Порода.
    pub breed: String,
    /// Вес свободным текстом («3.2», «3.2kg»).
    pub weight: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Питомец в теле регистрации.
pub struct PetPayload {
    /// Кличка.
    pub name: String,
    /// Вид.
    pub pet_type: Option<PetType>,
    /// Пол.
    pub gender: Option<PetGender>,
    /// Дата рождения.
    pub birthday: Option<String>,
    /// Порода.
    pub breed: Option<String>,
    /// Вес.
    pub weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Тело `POST /api/auth/register`.
pub struct RegisterRequest {
    /// Логин.
    pub user_id: String,
    /// Пароль.
    pub password: String,
    /// Ник.
    pub nickname: String,
    /// Почта.
    pub email: String,
    /// Адрес доставки.
    pub default_address: Option<String>,
    /// Телефон.
    pub phone: Option<String>,
    /// Интересующие виды.
    pub pet_list: Vec<PetType>,
    /// Свои питомцы.
    pub pets: Vec<PetPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Ошибки формы по ключам полей в порядке обнаружения.
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.push((key.into(), message.into()));
    }

    /// Нет ни одной ошибки.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ошибка поля.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, message)| message.as_str())
    }

    /// Первая ошибка, её показываем в alert.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(_, message)| message.as_str())
    }

    /// Количество ошибок.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Ключ ошибки клички питомца.
pub fn pet_name_key(index: usize) -> String {
    format!("pet_name_{index}")
}

/// Ключ ошибки вида питомца.
pub fn pet_type_key(index: usize) -> String {
    format!("pet_type_{index}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Результат проверки логина на занятость.
pub enum IdCheckState {
    /// Проверки не было или логин изменился.
    #[default]
    NotChecked,
    /// Проверка выполнена.
    Checked {
        /// Логин свободен.
        ok: bool,
        /// Сообщение под полем.
        message: String,
    },
}

fn opt(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Форма регистрации.
pub struct SignupForm {
    user_id: String,
    /// Пароль.
    pub password: String,
    /// Подтверждение пароля.
    pub password_confirm: String,
    /// Ник.
    pub nickname: String,
    /// Почта.
    pub email: String,
    /// Адрес доставки.
    pub default_address: String,
    /// Телефон.
    pub phone: String,
    interests: Vec<PetType>,
    has_pet: bool,
    pets: Vec<PetInput>,
    id_check: IdCheckState,
    server_message: Option<String>,
}

impl SignupForm {
    /// Логин.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Меняет логин и сбрасывает проверку занятости.
    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
        self.id_check = IdCheckState::NotChecked;
    }

    /// Выбранные виды.
    pub fn interests(&self) -> &[PetType] {
        &self.interests
    }

    /// Есть ли свои питомцы.
    pub fn has_pet(&self) -> bool {
        self.has_pet
    }

    /// Питомцы.
    pub fn pets(&self) -> &[PetInput] {
        &self.pets
    }

    /// Питомец для редактирования.
    pub fn pet_mut(&mut self, index: usize) -> Option<&mut PetInput> {
        self.pets.get_mut(index)
    }

    /// Проверка логина.
    pub fn id_check(&self) -> &IdCheckState {
        &self.id_check
    }

    /// Сообщение сервера под формой.
    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// Включает/выключает интерес к виду. Питомцы, чей вид больше не
    /// разрешён, теряют вид; без выбранных интересов ограничений нет.
    pub fn toggle_interest(&mut self, pet_type: PetType) {
        if let Some(pos) = self.interests.iter().position(|p| *p == pet_type) {
            self.interests.remove(pos);
        } else {
            self.interests.push(pet_type);
        }
        if self.interests.is_empty() {
            return;
        }
        for pet in &mut self.pets {
            if pet.pet_type.is_some_and(|t| !self.interests.contains(&t)) {
                pet.pet_type = None;
            }
        }
    }

    /// Виды, доступные для выбора у питомца.
    pub fn allowed_pet_types(&self) -> Vec<PetType> {
        if self.interests.is_empty() {
            PetType::ALL.to_vec()
        } else {
            PetType::ALL
                .into_iter()
                .filter(|t| self.interests.contains(t))
                .collect()
        }
    }

    /// «Есть питомец»: включение добавляет пустую карточку, выключение очищает список.
    pub fn toggle_has_pet(&mut self) {
        self.has_pet = !self.has_pet;
        self.pets = if self.has_pet {
            vec![PetInput::default()]
        } else {
            Vec::new()
        };
    }

    /// Добавляет пустую карточку питомца.
    pub fn add_pet(&mut self) {
        if self.has_pet {
            self.pets.push(PetInput::default());
        }
    }

    /// Удаляет карточку. Последнюю удалить нельзя, пока включено «есть питомец».
    pub fn remove_pet(&mut self, index: usize) -> bool {
        if index >= self.pets.len() || (self.has_pet && self.pets.len() == 1) {
            return false;
        }
        self.pets.remove(index);
        true
    }

    /// Проверка наличия полей и совпадения паролей.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.user_id.trim().is_empty() {
            errors.push("user_id", "Логин обязателен.");
        }
        if self.password.is_empty() {
            errors.push("password", "Пароль обязателен.");
        }
        if self.password_confirm.is_empty() {
            errors.push("password_confirm", "Повторите пароль.");
        } else if !self.password.is_empty() && self.password != self.password_confirm {
            errors.push("password_confirm", "Пароли не совпадают.");
        }
        if self.nickname.trim().is_empty() {
            errors.push("nickname", "Ник обязателен.");
        }
        if self.email.trim().is_empty() {
            errors.push("email", "Email обязателен.");
        }
        if self.has_pet {
            for (index, pet) in self.pets.iter().enumerate() {
                if pet.name.trim().is_empty() {
                    errors.push(pet_name_key(index), format!("Укажите кличку питомца {}.", index + 1));
                }
                if pet.pet_type.is_none() {
                    errors.push(pet_type_key(index), format!("Выберите вид питомца {}.", index + 1));
                }
            }
        }
        errors
    }

    /// Собирает тело регистрации или возвращает ошибки полей.
    pub fn build_request(&mut self) -> Result<RegisterRequest, FieldErrors> {
        self.server_message = None;
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let pets = if self.has_pet {
            self.pets
                .iter()
                .map(|p| PetPayload {
                    name: p.name.trim().to_string(),
                    pet_type: p.pet_type,
                    gender: p.gender,
                    birthday: opt(&p.birthday),
                    breed: opt(&p.breed),
                    weight: opt(&p.weight),
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(RegisterRequest {
            user_id: self.user_id.trim().to_string(),
            password: self.password.clone(),
            nickname: self.nickname.trim().to_string(),
            email: self.email.trim().to_string(),
            default_address: opt(&self.default_address),
            phone: opt(&self.phone),
            pet_list: self.interests.clone(),
            pets,
        })
    }

    /// Логин для проверки занятости. Пустой логин сразу даёт сообщение.
    pub fn begin_id_check(&mut self) -> Option<String> {
        self.server_message = None;
        match opt(&self.user_id) {
            Some(user_id) => Some(user_id),
            None => {
                self.id_check = IdCheckState::Checked {
                    ok: false,
                    message: "Сначала введите логин.".to_string(),
                };
                None
            }
        }
    }

    /// Применяет ответ проверки занятости.
    pub fn apply_id_check(&mut self, result: ApiResult<IdCheck>) {
        self.id_check = match result {
            Ok(check) => IdCheckState::Checked {
                ok: check.ok,
                message: check.msg,
            },
            Err(err) => IdCheckState::Checked {
                ok: false,
                message: err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Проверка не удалась (ошибка сервера).".to_string()),
            },
        };
    }

    /// Итог регистрации. При ошибке форма сохраняется, сообщение выводится под ней.
    pub fn finish_register(&mut self, result: ApiResult<ServerMessage>) -> ActionOutcome {
        match result {
            Ok(reply) => ActionOutcome::Succeeded {
                message: reply.msg.unwrap_or_else(|| "Регистрация завершена.".to_string()),
                navigate_to: Some(LOGIN_ROUTE.to_string()),
                refetch: false,
            },
            Err(err) => {
                let message = register_failure_message(&err);
                self.server_message = Some(message.clone());
                ActionOutcome::Failed(message)
            }
        }
    }
}

/// Сообщение для неудачной регистрации.
pub fn register_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Conflict(message) | ApiError::InvalidRequest(message) => message.clone(),
        ApiError::Network(_) => "Ошибка сети. Проверьте подключение к интернету.".to_string(),
        _ => "Временная проблема на сервере. Повторите попытку позже.".to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
/// Тело `POST /api/auth/login`.
pub struct LoginRequest {
    /// Логин.
    pub user_id: String,
    /// Пароль.
    pub password: String,
}

impl LoginRequest {
    /// Логин и пароль обязательны.
    pub fn new(user_id: &str, password: &str) -> Result<Self, &'static str> {
        let user_id = user_id.trim();
        if user_id.is_empty() || password.is_empty() {
            return Err("Введите логин и пароль.");
        }
        Ok(Self {
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }
}

/// Сообщение для неудачного входа.
pub fn login_failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Неверный логин или пароль.".to_string(),
        other => other.user_message(),
    }
}

#[derive(Debug, Clone, Serialize)]
/// Тело `POST /api/auth/find-id`.
pub struct FindIdRequest {
    /// Почта аккаунта.
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
/// Тело `POST /api/auth/reset-password`.
pub struct ResetPasswordRequest {
    /// Логин.
    pub user_id: String,
    /// Почта аккаунта.
    pub email: String,
}

impl FindIdRequest {
    /// Почта обязательна.
    pub fn new(email: &str) -> Result<Self, &'static str> {
        opt(email)
            .map(|email| Self { email })
            .ok_or("Введите email.")
    }
}

impl ResetPasswordRequest {
    /// Логин и почта обязательны.
    pub fn new(user_id: &str, email: &str) -> Result<Self, &'static str> {
        match (opt(user_id), opt(email)) {
            (Some(user_id), Some(email)) => Ok(Self { user_id, email }),
            _ => Err("Введите логин и email."),
        }
    }
}

/// Текст результата восстановления аккаунта.
pub fn recovery_message(result: ApiResult<ServerMessage>) -> String {
    match result {
        Ok(reply) => reply
            .msg
            .unwrap_or_else(|| "Запрос отправлен. Проверьте почту.".to_string()),
        Err(err) => err.user_message(),
    }
}
