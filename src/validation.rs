//! Input validation and sanitizing for users and tasks.
//!
//! Raw request bodies arrive as loosely typed `*Input` structs; the
//! `validate_*` functions turn them into the typed values the db layer takes.

use crate::types::{Category, NewTask, Priority, TaskUpdate};
use crate::views::dates::parse_due_date;
use serde::{Deserialize, Deserializer};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;
pub const PASSWORD_MAX: usize = 128;
pub const PAGE_LIMIT_MAX: u32 = 100;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Task title is required")]
    TitleRequired,
    #[error("Task title must be less than 100 characters")]
    TitleTooLong,
    #[error("Task description must be less than 500 characters")]
    DescriptionTooLong,
    #[error("Please select a valid category")]
    InvalidCategory,
    #[error("Please select a valid priority")]
    InvalidPriority,
    #[error("Please enter a valid due date")]
    InvalidDueDate,
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("Name must be less than 50 characters")]
    NameTooLong,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Password must be less than 128 characters")]
    PasswordTooLong,
    #[error("Page must be a positive number")]
    InvalidPage,
    #[error("Limit must be between 1 and 100")]
    InvalidLimit,
    #[error("No fields to update")]
    EmptyUpdate,
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        use ValidationError::*;
        match self {
            TitleRequired | TitleTooLong => "title",
            DescriptionTooLong => "description",
            InvalidCategory => "category",
            InvalidPriority => "priority",
            InvalidDueDate => "dueDate",
            NameRequired | NameTooShort | NameTooLong => "name",
            EmailRequired | InvalidEmail => "email",
            PasswordRequired | PasswordTooShort | PasswordTooLong => "password",
            InvalidPage => "page",
            InvalidLimit => "limit",
            EmptyUpdate => "body",
        }
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Registration request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated registration with a normalized email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Task creation request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// Task update request body. Absent fields are left alone; an explicit
/// `"dueDate": null` clears the due date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateInput {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
}

/// Distinguishes a field sent as `null` from one that was not sent.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Trim, drop angle brackets and collapse runs of whitespace.
pub fn sanitize_string(input: &str) -> String {
    input
        .replace(['<', '>'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_email(email: Option<&str>) -> ValidationResult<String> {
    let email = email.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    match regex_lite::Regex::new(EMAIL_PATTERN) {
        Ok(re) if re.is_match(email) => Ok(email.to_lowercase()),
        _ => Err(ValidationError::InvalidEmail),
    }
}

pub fn validate_password(password: Option<&str>) -> ValidationResult<String> {
    let password = password.unwrap_or_default();
    let len = password.chars().count();
    if len == 0 {
        Err(ValidationError::PasswordRequired)
    } else if len < PASSWORD_MIN {
        Err(ValidationError::PasswordTooShort)
    } else if len > PASSWORD_MAX {
        Err(ValidationError::PasswordTooLong)
    } else {
        Ok(password.to_string())
    }
}

fn validate_name(name: Option<&str>) -> ValidationResult<String> {
    let name = sanitize_string(name.unwrap_or_default());
    let len = name.chars().count();
    if len == 0 {
        Err(ValidationError::NameRequired)
    } else if len < NAME_MIN {
        Err(ValidationError::NameTooShort)
    } else if len > NAME_MAX {
        Err(ValidationError::NameTooLong)
    } else {
        Ok(name)
    }
}

pub fn validate_registration(input: &RegisterInput) -> ValidationResult<Registration> {
    Ok(Registration {
        name: validate_name(input.name.as_deref())?,
        email: validate_email(input.email.as_deref())?,
        password: validate_password(input.password.as_deref())?,
    })
}

fn validate_title(title: Option<&str>) -> ValidationResult<String> {
    let title = sanitize_string(title.unwrap_or_default());
    if title.is_empty() {
        Err(ValidationError::TitleRequired)
    } else if title.chars().count() > TITLE_MAX {
        Err(ValidationError::TitleTooLong)
    } else {
        Ok(title)
    }
}

/// Empty descriptions become `None`.
fn validate_description(description: Option<&str>) -> ValidationResult<Option<String>> {
    let description = description.map(str::trim).unwrap_or_default();
    if description.chars().count() > DESCRIPTION_MAX {
        Err(ValidationError::DescriptionTooLong)
    } else if description.is_empty() {
        Ok(None)
    } else {
        Ok(Some(description.replace(['<', '>'], "")))
    }
}

fn validate_category(category: &str) -> ValidationResult<Category> {
    category.parse().map_err(|_| ValidationError::InvalidCategory)
}

fn validate_priority(priority: &str) -> ValidationResult<Priority> {
    priority.parse().map_err(|_| ValidationError::InvalidPriority)
}

/// Empty or missing means no due date.
fn validate_due_date(due: Option<&str>) -> ValidationResult<Option<chrono::DateTime<chrono::Utc>>> {
    match due.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_due_date(s)
            .map(Some)
            .ok_or(ValidationError::InvalidDueDate),
    }
}

pub fn validate_new_task(input: &TaskInput) -> ValidationResult<NewTask> {
    let title = validate_title(input.title.as_deref())?;
    let description = validate_description(input.description.as_deref())?;
    let category = validate_category(input.category.as_deref().unwrap_or_default())?;
    let priority = validate_priority(input.priority.as_deref().unwrap_or_default())?;
    let due_date = validate_due_date(input.due_date.as_deref())?;
    Ok(NewTask {
        title,
        description,
        category,
        priority,
        due_date,
    })
}

pub fn validate_task_update(input: &TaskUpdateInput) -> ValidationResult<TaskUpdate> {
    let update = TaskUpdate {
        title: input
            .title
            .as_deref()
            .map(|t| validate_title(Some(t)))
            .transpose()?,
        description: input
            .description
            .as_ref()
            .map(|d| validate_description(d.as_deref()))
            .transpose()?,
        category: input.category.as_deref().map(validate_category).transpose()?,
        priority: input.priority.as_deref().map(validate_priority).transpose()?,
        completed: input.completed,
        due_date: input
            .due_date
            .as_ref()
            .map(|d| validate_due_date(d.as_deref()))
            .transpose()?,
    };
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    Ok(update)
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn skip(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// `None` when neither value is given, meaning "no paging".
pub fn validate_pagination(
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: u32,
) -> ValidationResult<Option<Pagination>> {
    let page = page.map(str::trim).filter(|s| !s.is_empty());
    let limit = limit.map(str::trim).filter(|s| !s.is_empty());
    if page.is_none() && limit.is_none() {
        return Ok(None);
    }

    let page = match page {
        Some(p) => p
            .parse::<u32>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or(ValidationError::InvalidPage)?,
        None => 1,
    };
    let limit = match limit {
        Some(l) => l
            .parse::<u32>()
            .ok()
            .filter(|l| (1..=PAGE_LIMIT_MAX).contains(l))
            .ok_or(ValidationError::InvalidLimit)?,
        None => default_limit.clamp(1, PAGE_LIMIT_MAX),
    };
    Ok(Some(Pagination { page, limit }))
}
