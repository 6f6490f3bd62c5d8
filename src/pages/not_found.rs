use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Uh oh!"</h1>
		<p>"We couldn't find that page. Try the graph explorer at the root path."</p>
	}
}
