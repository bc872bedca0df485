//! Starter content shown in a fresh playground.

use super::Buffers;

const STARTER_HTML: &str = r#"<main class="card">
  <h1>Hello, playground!</h1>
  <p>Edit the HTML, CSS and JavaScript buffers and watch the preview update.</p>
  <button id="greet">Say hello</button>
</main>
"#;

const STARTER_CSS: &str = r#"body {
  font-family: system-ui, sans-serif;
  margin: 2rem;
}

.card {
  max-width: 32rem;
  padding: 1.5rem;
  border-radius: 0.5rem;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.15);
}
"#;

const STARTER_JS: &str = r#"const button = document.getElementById("greet");
button.addEventListener("click", () => {
  console.log("hello from the sandbox");
});
console.log("preview ready");
"#;

/// Buffers used when nothing was persisted (and by the reset command).
pub fn starter() -> Buffers {
    Buffers::new(STARTER_HTML, STARTER_CSS, STARTER_JS)
}
