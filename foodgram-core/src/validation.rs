//! Input rules for users, recipes, tags and ingredients.
//!
//! Each `validate_*` function checks only what can be decided from the
//! input itself. Existence checks (does tag 7 exist?) belong to the caller
//! that owns the database connection.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_MEASUREMENT_UNIT_LENGTH: usize = 200;
pub const MAX_SLUG_LENGTH: usize = 200;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_PERSON_NAME_LENGTH: usize = 150;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 32_000;
pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

/// Path segment taken by `/api/users/me/`.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error(
        "cooking_time must be between {} and {} minutes",
        MIN_COOKING_TIME,
        MAX_COOKING_TIME
    )]
    CookingTimeOutOfRange,

    #[error("At least one tag is required")]
    NoTags,

    #[error("Tag {0} is listed more than once")]
    DuplicateTag(i32),

    #[error("At least one ingredient is required")]
    NoIngredients,

    #[error("Ingredient {0} is listed more than once")]
    DuplicateIngredient(i32),

    #[error("Amount of ingredient {0} must be at least {min}", min = MIN_INGREDIENT_AMOUNT)]
    AmountTooSmall(i32),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Username may contain only letters, digits and @/./+/-/_ characters")]
    InvalidUsername,

    #[error("Username \"{}\" is reserved", RESERVED_USERNAME)]
    ReservedUsername,

    #[error("Enter a valid hex color, e.g. #49B64E")]
    InvalidColor,

    #[error("Slug may contain only letters, digits, hyphens and underscores")]
    InvalidSlug,
}

/// One `{id, amount}` entry of a recipe's ingredient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub id: i32,
    pub amount: i32,
}

/// Recipe fields as submitted. Scalar fields are optional so partial
/// updates can leave them out; tags and ingredients are always complete
/// sets because an edit replaces them wholesale.
#[derive(Debug, Clone, Copy)]
pub struct RecipeInput<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i32>,
    pub tags: &'a [i32],
    pub ingredients: &'a [IngredientAmount],
}

pub fn validate_recipe(input: &RecipeInput<'_>) -> Result<(), ValidationError> {
    if let Some(name) = input.name {
        require_text("name", name, MAX_NAME_LENGTH)?;
    }
    if let Some(text) = input.text {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }
    }
    if let Some(cooking_time) = input.cooking_time {
        if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&cooking_time) {
            return Err(ValidationError::CookingTimeOutOfRange);
        }
    }

    if input.tags.is_empty() {
        return Err(ValidationError::NoTags);
    }
    let mut seen_tags = HashSet::with_capacity(input.tags.len());
    for tag in input.tags {
        if !seen_tags.insert(*tag) {
            return Err(ValidationError::DuplicateTag(*tag));
        }
    }

    if input.ingredients.is_empty() {
        return Err(ValidationError::NoIngredients);
    }
    let mut seen_ingredients = HashSet::with_capacity(input.ingredients.len());
    for ingredient in input.ingredients {
        if ingredient.amount < MIN_INGREDIENT_AMOUNT {
            return Err(ValidationError::AmountTooSmall(ingredient.id));
        }
        if !seen_ingredients.insert(ingredient.id) {
            return Err(ValidationError::DuplicateIngredient(ingredient.id));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub struct SignupInput<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

pub fn validate_signup(input: &SignupInput<'_>) -> Result<(), ValidationError> {
    require_text("email", input.email, MAX_EMAIL_LENGTH)?;
    if !EMAIL_RE.is_match(input.email) {
        return Err(ValidationError::InvalidEmail);
    }

    require_text("username", input.username, MAX_USERNAME_LENGTH)?;
    if !USERNAME_RE.is_match(input.username) {
        return Err(ValidationError::InvalidUsername);
    }
    if input.username.eq_ignore_ascii_case(RESERVED_USERNAME) {
        return Err(ValidationError::ReservedUsername);
    }

    require_text("first_name", input.first_name, MAX_PERSON_NAME_LENGTH)?;
    require_text("last_name", input.last_name, MAX_PERSON_NAME_LENGTH)?;
    validate_password(input.password)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty { field: "password" });
    }
    Ok(())
}

pub fn validate_tag(name: &str, color: &str, slug: &str) -> Result<(), ValidationError> {
    require_text("name", name, MAX_NAME_LENGTH)?;
    if !HEX_COLOR_RE.is_match(color) {
        return Err(ValidationError::InvalidColor);
    }
    require_text("slug", slug, MAX_SLUG_LENGTH)?;
    if !SLUG_RE.is_match(slug) {
        return Err(ValidationError::InvalidSlug);
    }
    Ok(())
}

pub fn validate_ingredient(name: &str, measurement_unit: &str) -> Result<(), ValidationError> {
    require_text("name", name, MAX_NAME_LENGTH)?;
    require_text(
        "measurement_unit",
        measurement_unit,
        MAX_MEASUREMENT_UNIT_LENGTH,
    )
}

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(pairs: &[(i32, i32)]) -> Vec<IngredientAmount> {
        pairs
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect()
    }

    fn recipe<'a>(tags: &'a [i32], ingredients: &'a [IngredientAmount]) -> RecipeInput<'a> {
        RecipeInput {
            name: Some("Pancakes"),
            text: Some("Mix and fry."),
            cooking_time: Some(20),
            tags,
            ingredients,
        }
    }

    #[test]
    fn test_valid_recipe() {
        let ingredients = amounts(&[(1, 200), (2, 3)]);
        assert_eq!(validate_recipe(&recipe(&[1, 2], &ingredients)), Ok(()));
    }

    #[test]
    fn test_partial_update_skips_missing_scalars() {
        let ingredients = amounts(&[(1, 200)]);
        let input = RecipeInput {
            name: None,
            text: None,
            cooking_time: None,
            tags: &[1],
            ingredients: &ingredients,
        };
        assert_eq!(validate_recipe(&input), Ok(()));
    }

    #[test]
    fn test_rejects_blank_name() {
        let ingredients = amounts(&[(1, 200)]);
        let input = RecipeInput {
            name: Some("   "),
            ..recipe(&[1], &ingredients)
        };
        assert_eq!(
            validate_recipe(&input),
            Err(ValidationError::Empty { field: "name" })
        );
    }

    #[test]
    fn test_rejects_long_name() {
        let ingredients = amounts(&[(1, 200)]);
        let long_name = "a".repeat(MAX_NAME_LENGTH + 1);
        let input = RecipeInput {
            name: Some(&long_name),
            ..recipe(&[1], &ingredients)
        };
        assert_eq!(
            validate_recipe(&input),
            Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LENGTH
            })
        );
    }

    #[test]
    fn test_cooking_time_bounds() {
        let ingredients = amounts(&[(1, 200)]);
        for (minutes, ok) in [(0, false), (1, true), (32_000, true), (32_001, false)] {
            let input = RecipeInput {
                cooking_time: Some(minutes),
                ..recipe(&[1], &ingredients)
            };
            assert_eq!(validate_recipe(&input).is_ok(), ok, "cooking_time={minutes}");
        }
    }

    #[test]
    fn test_rejects_missing_and_duplicate_tags() {
        let ingredients = amounts(&[(1, 200)]);
        assert_eq!(
            validate_recipe(&recipe(&[], &ingredients)),
            Err(ValidationError::NoTags)
        );
        assert_eq!(
            validate_recipe(&recipe(&[3, 4, 3], &ingredients)),
            Err(ValidationError::DuplicateTag(3))
        );
    }

    #[test]
    fn test_rejects_duplicate_ingredient_in_one_recipe() {
        let ingredients = amounts(&[(5, 100), (5, 50)]);
        assert_eq!(
            validate_recipe(&recipe(&[1], &ingredients)),
            Err(ValidationError::DuplicateIngredient(5))
        );
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let zero = amounts(&[(5, 0)]);
        assert_eq!(
            validate_recipe(&recipe(&[1], &zero)),
            Err(ValidationError::AmountTooSmall(5))
        );
        let negative = amounts(&[(6, -10)]);
        assert_eq!(
            validate_recipe(&recipe(&[1], &negative)),
            Err(ValidationError::AmountTooSmall(6))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::AmountTooSmall(5).to_string(),
            "Amount of ingredient 5 must be at least 1"
        );
        assert_eq!(
            ValidationError::CookingTimeOutOfRange.to_string(),
            "cooking_time must be between 1 and 32000 minutes"
        );
        assert_eq!(
            ValidationError::ReservedUsername.to_string(),
            "Username \"me\" is reserved"
        );
    }

    #[test]
    fn test_rejects_empty_ingredients() {
        assert_eq!(
            validate_recipe(&recipe(&[1], &[])),
            Err(ValidationError::NoIngredients)
        );
    }

    fn signup<'a>(email: &'a str, username: &'a str) -> SignupInput<'a> {
        SignupInput {
            email,
            username,
            first_name: "Ivan",
            last_name: "Petrov",
            password: "correct horse",
        }
    }

    #[test]
    fn test_signup_rules() {
        assert_eq!(validate_signup(&signup("ivan@example.com", "ivan.p")), Ok(()));
        assert_eq!(
            validate_signup(&signup("not-an-email", "ivan")),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_signup(&signup("ivan@example.com", "ivan petrov")),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(
            validate_signup(&signup("ivan@example.com", "Me")),
            Err(ValidationError::ReservedUsername)
        );
    }

    #[test]
    fn test_signup_requires_password() {
        let input = SignupInput {
            password: "",
            ..signup("ivan@example.com", "ivan")
        };
        assert_eq!(
            validate_signup(&input),
            Err(ValidationError::Empty { field: "password" })
        );
    }

    #[test]
    fn test_tag_rules() {
        assert_eq!(validate_tag("Breakfast", "#E26C2D", "breakfast"), Ok(()));
        assert_eq!(
            validate_tag("Breakfast", "E26C2D", "breakfast"),
            Err(ValidationError::InvalidColor)
        );
        assert_eq!(
            validate_tag("Breakfast", "#E26C2D", "early breakfast"),
            Err(ValidationError::InvalidSlug)
        );
    }

    #[test]
    fn test_ingredient_rules() {
        assert_eq!(validate_ingredient("абрикосы", "г"), Ok(()));
        assert_eq!(
            validate_ingredient("salt", " "),
            Err(ValidationError::Empty {
                field: "measurement_unit"
            })
        );
    }
}
