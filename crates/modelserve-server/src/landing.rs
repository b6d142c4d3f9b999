use axum::response::Html;

/// Serve the static landing page
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_HTML)
}

const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>modelserve</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 3rem auto; padding: 0 1rem; color: #1f2937; }
        code, pre { background: #f3f4f6; border-radius: 4px; padding: 0.1rem 0.3rem; }
        pre { padding: 1rem; overflow-x: auto; }
        #output { min-height: 3rem; }
    </style>
</head>
<body>
    <h1>modelserve</h1>
    <p>Send a feature vector to a model with <code>POST /predict/&lt;model_name&gt;</code>.</p>
    <pre>curl -X POST http://localhost:8080/predict/linear_reg \
     -H 'Content-Type: application/json' \
     -d '{"features": [1.0, 2.0]}'</pre>

    <form id="predict">
        <label>Model
            <select id="model">
                <option>linear_reg</option>
                <option>logistic_reg</option>
                <option>decision_tree</option>
                <option>random_forest</option>
                <option>kmeans</option>
            </select>
        </label>
        <label>Features <input id="features" value="1.0, 2.0"></label>
        <button type="submit">Predict</button>
    </form>
    <pre id="output"></pre>

    <script>
        document.getElementById('predict').addEventListener('submit', async (event) => {
            event.preventDefault();
            const model = document.getElementById('model').value;
            const features = document.getElementById('features').value
                .split(',').map((v) => Number(v.trim()));
            const response = await fetch(`/predict/${model}`, {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ features }),
            });
            document.getElementById('output').textContent =
                JSON.stringify(await response.json(), null, 2);
        });
    </script>
</body>
</html>
"#;
