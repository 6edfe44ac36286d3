//! HTML rendering of the dashboard page.
//!
//! A page is a head (styles, title, loading indicator) followed by a body
//! (grid, modals, script). The two halves render separately so the head can
//! be sent before the records arrive.

use chrono::TimeZone;
use minijinja::{context, Environment};
use std::fmt::Display;

use crate::error::ClientError;
use crate::session::LoadState;
use crate::view::TileView;

const HEAD_TEMPLATE: &str = "head.html";
const BODY_TEMPLATE: &str = "body.html";

/// Page renderer. The `.html` template names turn on autoescaping, so stored
/// text (locations, labels) cannot inject markup.
pub struct Renderer {
    env: Environment<'static>,
    placeholder: String,
}

impl Renderer {
    pub fn new(placeholder: impl Into<String>) -> Result<Self, ClientError> {
        let mut env = Environment::new();
        env.add_template(HEAD_TEMPLATE, include_str!("../templates/head.html"))?;
        env.add_template(BODY_TEMPLATE, include_str!("../templates/body.html"))?;
        Ok(Self { env, placeholder: placeholder.into() })
    }

    /// Opening half of the page, with the loading indicator when `loading`.
    pub fn render_head(&self, loading: bool) -> Result<String, ClientError> {
        let template = self.env.get_template(HEAD_TEMPLATE)?;
        Ok(template.render(context! { loading })?)
    }

    /// Closing half of the page. Once records are loaded it carries the grid,
    /// the modals, and a script that removes the indicator.
    pub fn render_body<Tz>(
        &self,
        load: &LoadState,
        selected: Option<usize>,
        tz: &Tz,
    ) -> Result<String, ClientError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let (loading, tiles) = match load {
            LoadState::Loading => (true, Vec::new()),
            LoadState::Ready(records) => (
                false,
                records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| TileView::from_record(i, r, &self.placeholder, tz))
                    .collect::<Vec<_>>(),
            ),
        };

        let template = self.env.get_template(BODY_TEMPLATE)?;
        Ok(template.render(context! { loading, tiles, selected })?)
    }

    /// The whole page for a single state.
    pub fn render_page<Tz>(
        &self,
        load: &LoadState,
        selected: Option<usize>,
        tz: &Tz,
    ) -> Result<String, ClientError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut page = self.render_head(matches!(load, LoadState::Loading))?;
        page.push_str(&self.render_body(load, selected, tz)?);
        Ok(page)
    }
}
