use dominator::{clone, html, Dom};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, FormData, HtmlElement, HtmlFormElement, UrlSearchParams};

use crate::common::{
    compute_card_removal, compute_next_button_state, notification, outcome_message, ButtonPatch,
    ButtonState, ButtonTarget, PageContext, ACTIVE_CLASS, CARD_FADE_MS, FAVORITE_ATTRIBUTE,
};
use crate::config;
use crate::query;
use crate::utils::{count, document, js_error, pathname};

const FORM_SELECTOR: &str = ".favorite-form";
const CARD_SELECTOR: &str = ".movie-card";
const GRID_SELECTOR: &str = ".movies-grid";
const EMPTY_CLASS: &str = "empty-favorites";

/// Binds the forms now, or once the document has finished parsing.
pub fn bind_when_ready() {
    if document().ready_state() != "loading" {
        bind_or_log();
        return;
    }

    let closure = Closure::wrap(Box::new(|_: Event| bind_or_log()) as Box<dyn FnMut(_)>);
    if let Err(e) = document()
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
    {
        error!("{}", js_error("error listen DOMContentLoaded", e));
    }
    closure.forget();
}

fn bind_or_log() {
    match bind_favorite_forms() {
        Ok(bound) => info!("bound {} favorite forms", bound),
        Err(e) => error!("{}", e),
    }
}

pub fn bind_favorite_forms() -> Result<u32, anyhow::Error> {
    let forms = document()
        .query_selector_all(FORM_SELECTOR)
        .map_err(|e| js_error("error query favorite forms", e))?;

    let mut bound = 0;
    for i in 0..forms.length() {
        let Some(form) = forms
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlFormElement>().ok())
        else {
            continue;
        };

        let closure = Closure::wrap(Box::new(clone!(form => move |e: Event| {
            e.prevent_default();
            FavoriteForm::submit(&form);
        })) as Box<dyn FnMut(_)>);

        form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
            .map_err(|e| js_error("error listen submit", e))?;
        closure.forget();
        bound += 1;
    }

    Ok(bound)
}

struct FavoriteForm {
    form: HtmlFormElement,
    url: String,
    body: String,
    context: PageContext,
}

impl FavoriteForm {
    fn read(form: &HtmlFormElement) -> Result<Self, anyhow::Error> {
        let data = FormData::new_with_form(form).map_err(|e| js_error("error read form", e))?;
        let body = UrlSearchParams::new_with_str_sequence_sequence(&data)
            .map_err(|e| js_error("error encode form", e))?
            .to_string()
            .into();

        Ok(Self {
            form: form.clone(),
            url: form.action(),
            body,
            context: PageContext::from_path(&pathname(), &config::get().favorites_path),
        })
    }

    fn submit(form: &HtmlFormElement) {
        let favorite_form = match Self::read(form) {
            Ok(favorite_form) => favorite_form,
            Err(e) => {
                error!("{}", e);
                notification::show_error(&config::get().messages.failed);
                return;
            }
        };

        spawn_local(favorite_form.send());
    }

    async fn send(self) {
        let config = config::get();
        debug!("toggle favorite {} ({:?})", self.url, self.context);

        if let Err(e) = query::post_form(&self.url, self.body.clone()).await {
            error!("error update favorite {}: {}", self.url, e);
            notification::show_error(&config.messages.failed);
            return;
        }

        match self.context {
            PageContext::FavoritesList => {
                let card = self.fade_card();
                notification::show_success(outcome_message(
                    &config.messages,
                    self.context,
                    None,
                ));

                if let Some(card) = card {
                    TimeoutFuture::new(CARD_FADE_MS).await;
                    if let Err(e) = remove_card(card, &config.messages.empty_favorites) {
                        error!("{}", e);
                    }
                }
            }
            PageContext::Catalog => {
                let next = self.toggle_button().unwrap_or_else(|e| {
                    error!("{}", e);
                    None
                });
                notification::show_success(outcome_message(
                    &config.messages,
                    self.context,
                    next.as_ref(),
                ));
            }
        }
    }

    fn fade_card(&self) -> Option<Element> {
        let card = match self.form.closest(CARD_SELECTOR) {
            Ok(Some(card)) => card,
            Ok(None) => {
                warn!("favorite form {} is not inside a movie card", self.url);
                return None;
            }
            Err(e) => {
                error!("{}", js_error("error find movie card", e));
                return None;
            }
        };

        if let Some(card) = card.dyn_ref::<HtmlElement>() {
            if let Err(e) = card.style().set_property("opacity", "0") {
                warn!("{}", js_error("error fade movie card", e));
            }
        }

        Some(card)
    }

    fn toggle_button(&self) -> Result<Option<ButtonState>, anyhow::Error> {
        let Some(button) = self
            .form
            .query_selector("button")
            .map_err(|e| js_error("error query button", e))?
            .and_then(|button| button.dyn_into::<HtmlElement>().ok())
        else {
            warn!("favorite form {} has no button", self.url);
            return Ok(None);
        };

        let class_list = button.class_list();
        let current = ButtonState::from_markup(
            class_list.contains(ACTIVE_CLASS),
            button.get_attribute(FAVORITE_ATTRIBUTE).as_deref(),
            &button.text_content().unwrap_or_default(),
        );
        let next = compute_next_button_state(&current);
        if !ButtonPatch::between(&current, &next).apply(&button) {
            warn!("favorite button for {} only partly updated", self.url);
        }

        Ok(Some(next))
    }
}

impl ButtonTarget for HtmlElement {
    fn set_favorite(&self, favorite: bool) -> Result<(), anyhow::Error> {
        self.set_attribute(FAVORITE_ATTRIBUTE, if favorite { "true" } else { "false" })
            .map_err(|e| js_error("error set favorite attribute", e))
    }

    fn set_label(&self, label: &str) -> Result<(), anyhow::Error> {
        self.set_text_content(Some(label));
        Ok(())
    }

    fn set_color(&self, color: &str) -> Result<(), anyhow::Error> {
        self.style()
            .set_property("color", color)
            .map_err(|e| js_error("error set heart color", e))
    }

    fn set_active(&self, active: bool) -> Result<(), anyhow::Error> {
        self.class_list()
            .toggle_with_force(ACTIVE_CLASS, active)
            .map(|_| ())
            .map_err(|e| js_error("error toggle active", e))
    }
}

fn remove_card(card: Element, empty_message: &str) -> Result<(), anyhow::Error> {
    card.remove();

    let removal = compute_card_removal(
        count(CARD_SELECTOR)?,
        count(&format!(".{}", EMPTY_CLASS))? > 0,
    );
    if !removal.show_empty_state {
        return Ok(());
    }

    match document()
        .query_selector(GRID_SELECTOR)
        .map_err(|e| js_error("error query movies grid", e))?
    {
        Some(grid) => {
            dominator::append_dom(&grid, render_empty_state(empty_message));
        }
        None => warn!("no {} to show the empty state in", GRID_SELECTOR),
    }

    Ok(())
}

fn render_empty_state(message: &str) -> Dom {
    html!("div", {
        .class(EMPTY_CLASS)
        .style("text-align", "center")
        .style("padding", "40px")
        .style("color", "#666")
        .text(message)
    })
}
