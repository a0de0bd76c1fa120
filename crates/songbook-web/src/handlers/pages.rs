//! Static content pages

use axum::response::Html;

use crate::auth::CurrentUser;
use crate::views;

pub async fn index(user: CurrentUser) -> Html<String> {
    Html(views::index_page(user.user()))
}

pub async fn about(user: CurrentUser) -> Html<String> {
    Html(views::about_page(user.user()))
}

pub async fn welcome(user: CurrentUser) -> Html<String> {
    Html(views::welcome_page(user.user()))
}
