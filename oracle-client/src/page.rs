//! Standalone HTML page around the results and error containers.
//!
//! Used by the CLI when writing `--output page.html` and by the presentation
//! server for `GET /`.

use oracle_render::{escape_html, ViewModel};

/// What the page shows on load.
#[derive(Debug, Clone, Copy)]
pub enum PageState<'a> {
    /// Fresh page, both containers hidden.
    Empty,
    /// Results container visible.
    Results(&'a ViewModel),
    /// Error container visible. The message must already be escaped.
    Error(&'a str),
}

/// Page options.
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// Question shown in the input box (unescaped).
    pub query: Option<String>,
    /// Status line text (unescaped).
    pub status: Option<String>,
    /// Include the script that submits to `/api/view`.
    pub interactive: bool,
}

const STYLE: &str = r#"
body { background: #000; color: #00ff41; font-family: "Courier New", monospace; margin: 0; }
main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; position: relative; z-index: 1; }
h1 { text-align: center; letter-spacing: 0.2em; }
.binary-rain { position: fixed; inset: 0; opacity: 0.06; word-break: break-all; font-size: 2rem; pointer-events: none; }
.panel { border: 1px solid #00ff41; padding: 1rem; margin: 1rem 0; background: rgba(0, 20, 0, 0.85); }
.query-row { display: flex; gap: 0.5rem; }
#query-input { flex: 1; background: #000; color: #00ff41; border: 1px solid #00ff41; padding: 0.6rem; }
#analisar-btn { background: #00ff41; color: #000; border: 0; padding: 0.6rem 1.2rem; cursor: pointer; }
.result-label { margin-top: 1rem; font-weight: bold; text-transform: uppercase; color: #7dffa1; }
.result-value { margin: 0.3rem 0 0.8rem 1rem; line-height: 1.5; }
.result-raw { white-space: pre-wrap; }
.error-panel { color: #ff6b6b; border-color: #ff6b6b; }
footer { text-align: center; opacity: 0.6; font-size: 0.8rem; }
"#;

const SCRIPT: &str = r#"
(function () {
  var input = document.getElementById('query-input');
  var button = document.getElementById('analisar-btn');
  var status = document.getElementById('status');
  var results = document.getElementById('results');
  var error = document.getElementById('error');

  function showError(html) {
    results.hidden = true;
    error.hidden = false;
    error.innerHTML = '<strong>ERRO:</strong> ' + html;
    status.textContent = 'Erro na análise';
  }

  async function analyze() {
    status.textContent = 'Processando análise...';
    results.innerHTML = '';
    try {
      var response = await fetch('/api/view', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ query: input.value })
      });
      var data = await response.json();
      if (response.ok) {
        error.hidden = true;
        results.hidden = false;
        results.innerHTML = data.html;
        status.textContent = 'Análise concluída';
      } else {
        showError(data.error_html || 'Erro ao processar a análise');
      }
    } catch (e) {
      var div = document.createElement('div');
      div.textContent = 'Erro de conexão: ' + e.message;
      showError(div.innerHTML);
    }
  }

  button.addEventListener('click', analyze);
  input.addEventListener('keypress', function (e) { if (e.key === 'Enter') { analyze(); } });
})();
"#;

/// Render the full document.
pub fn render_page(state: PageState<'_>, options: &PageOptions) -> String {
    let (results_html, results_hidden, error_html, error_hidden) = match state {
        PageState::Empty => (String::new(), true, String::new(), true),
        PageState::Results(view) => (view.to_html(), false, String::new(), true),
        PageState::Error(message) => (
            String::new(),
            true,
            format!("<strong>ERRO:</strong> {message}"),
            false,
        ),
    };

    let query = escape_html(options.query.as_deref().unwrap_or_default());
    let status = escape_html(options.status.as_deref().unwrap_or_default());
    let generated_at = chrono::Local::now().format("%d/%m/%Y %H:%M:%S");
    let script = if options.interactive {
        format!("<script>{SCRIPT}</script>")
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Oracle Bíblico</title>
<style>{STYLE}</style>
</head>
<body>
<div class="binary-rain" aria-hidden="true">{rain}</div>
<main>
<h1>ORACLE BÍBLICO</h1>
<section class="panel">
<div class="query-row">
<input id="query-input" type="text" placeholder="Digite sua pergunta bíblica" value="{query}">
<button id="analisar-btn" type="button">ANALISAR</button>
</div>
<div id="status" class="status">{status}</div>
</section>
<section id="results" class="panel"{results_attr}>{results_html}</section>
<section id="error" class="panel error-panel"{error_attr}>{error_html}</section>
<footer>Gerado em {generated_at}</footer>
</main>
{script}
</body>
</html>
"#,
        rain = "01".repeat(100),
        results_attr = hidden_attr(results_hidden),
        error_attr = hidden_attr(error_hidden),
    )
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden {
        " hidden"
    } else {
        ""
    }
}
