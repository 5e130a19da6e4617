use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: i32,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub user_id: i32,
    pub author_id: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub slug: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

/// Recipe row without the image bytes, which are only read by the image endpoint.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: &'a [u8],
    pub image_content_type: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::shopping_cart)]
pub struct NewCartEntry {
    pub user_id: i32,
    pub recipe_id: i32,
}
