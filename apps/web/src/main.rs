mod shell;
mod source;
mod views;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use market_core::{run_job, Route};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;

use crate::shell::{Clock, Shell};
use crate::source::WebSource;

fn main() -> io::Result<()> {
    let route = current_path().map_or(Route::Map, |path| Route::from_path(&path));
    let shell = Rc::new(RefCell::new(Shell::new(Clock::Browser, route)));

    spawn_local(connect(shell.clone()));
    follow_history(shell.clone());

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let shell = shell.clone();
        move |event| {
            let route_changed = {
                let mut state = shell.borrow_mut();
                let before = state.route;
                state.handle_key(&event.code);
                (state.route != before).then_some(state.route)
            };
            if let Some(route) = route_changed {
                push_path(route);
            }
            dispatch(&shell);
        }
    });

    terminal.draw_web(move |f| {
        views::render(&shell.borrow(), f);
    });

    Ok(())
}

/// Picks the data source, then runs whatever the first view queued.
async fn connect(shell: Rc<RefCell<Shell>>) {
    match WebSource::resolve().await {
        Ok(source) => {
            web_sys::console::log_1(&format!("using {} source", source.describe()).into());
            shell.borrow_mut().source = Some(Rc::new(source));
        }
        Err(error) => {
            web_sys::console::error_1(&format!("No data source: {error}").into());
            shell.borrow_mut().source_error = Some(error.to_string());
        }
    }
    dispatch(&shell);
}

/// Spawns the shell's queued fetches; each writes its outcome back when it
/// finishes.
fn dispatch(shell: &Rc<RefCell<Shell>>) {
    let Some((source, jobs)) = shell.borrow_mut().take_jobs() else {
        return;
    };
    for job in jobs {
        let source = source.clone();
        let shell = shell.clone();
        spawn_local(async move {
            let outcome = run_job(source.as_ref(), job).await;
            shell.borrow_mut().apply(outcome);
        });
    }
}

fn current_path() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

/// Back and forward buttons move the shell to whatever path the browser
/// now shows.
fn follow_history(shell: Rc<RefCell<Shell>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_popstate = Closure::<dyn FnMut()>::new(move || {
        shell
            .borrow_mut()
            .follow_path(current_path().as_deref().unwrap_or("/"));
        dispatch(&shell);
    });
    window.set_onpopstate(Some(on_popstate.as_ref().unchecked_ref()));
    on_popstate.forget();
}

fn push_path(route: Route) {
    let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
        return;
    };
    if let Err(error) = history.push_state_with_url(&JsValue::NULL, "", Some(route.path())) {
        web_sys::console::error_1(&error);
    }
}
