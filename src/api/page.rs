//! Embedded GUI page (self-contained, no external resources).

use axum::response::Html;

/// `GET /` — serve the single-page GUI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Image Processing Pipeline</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #f8fafc; color: #0f172a;
      min-height: 100vh; padding: 32px 24px;
      display: flex; flex-direction: column; align-items: center;
    }
    header { text-align: center; margin-bottom: 24px; }
    h1 { font-size: 28px; margin-bottom: 6px; }
    .tagline { color: #64748b; font-size: 14px; }
    .badge {
      display: inline-block; margin-top: 10px; padding: 4px 12px;
      font-size: 12px; border: 1px solid #cbd5e1; border-radius: 999px;
      color: #64748b;
    }
    .badge.ready { border-color: #16a34a; color: #16a34a; }
    .badge.error { border-color: #dc2626; color: #dc2626; }
    .drop-zone {
      width: 100%; max-width: 520px; padding: 56px 24px;
      border: 2px dashed #cbd5e1; border-radius: 16px; background: white;
      text-align: center; cursor: pointer;
    }
    .drop-zone.drag-over { border-color: #4f46e5; background: #eef2ff; }
    .drop-zone-icon { font-size: 40px; margin-bottom: 12px; }
    .drop-zone strong { color: #4f46e5; }
    .hint { color: #64748b; font-size: 13px; margin-top: 8px; }
    #file-input { display: none; }
    .overlay {
      position: fixed; inset: 0; background: rgba(248, 250, 252, 0.85);
      display: flex; align-items: center; justify-content: center;
      font-size: 16px; color: #334155;
    }
    .results { width: 100%; max-width: 1080px; }
    .summary {
      display: flex; align-items: center; justify-content: space-between;
      margin-bottom: 16px; color: #64748b; font-size: 14px;
    }
    .grid {
      display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 16px;
    }
    figure {
      background: white; border: 1px solid #e2e8f0; border-radius: 12px;
      padding: 12px; text-align: center;
    }
    figure img { max-width: 100%; height: auto; border-radius: 6px; image-rendering: pixelated; }
    figcaption { margin-top: 8px; font-size: 13px; font-weight: 600; color: #334155; }
    .btn {
      padding: 10px 20px; border-radius: 8px; border: 1px solid #cbd5e1;
      background: white; color: #334155; font-size: 14px; cursor: pointer;
    }
    .btn:hover { border-color: #4f46e5; color: #4f46e5; }
    .status.error { margin-top: 16px; color: #dc2626; font-size: 14px; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <header>
    <h1>Image Processing Pipeline</h1>
    <p class="tagline">Raw Image &rarr; Cleaning &rarr; Enhancement &rarr; Feature Extraction</p>
    <span class="badge" id="api-status">Connecting&hellip;</span>
  </header>

  <div class="drop-zone" id="drop-zone">
    <div class="drop-zone-icon">&#128247;</div>
    <p><strong>Drop an image here</strong> or click to browse</p>
    <p class="hint">JPEG, PNG, or WebP &middot; up to 20 MB</p>
  </div>
  <input type="file" id="file-input" accept="image/*">

  <div class="overlay hidden" id="loading-overlay">Processing&hellip;</div>

  <section class="results hidden" id="results-section">
    <div class="summary">
      <span id="summary-text"></span>
      <button class="btn" id="reset-btn">Process another image</button>
    </div>
    <div class="grid">
      <figure><img id="res-resized" alt="Resized Image"><figcaption>Resized Image</figcaption></figure>
      <figure><img id="res-gray" alt="Grayscale Image"><figcaption>Grayscale Image</figcaption></figure>
      <figure><img id="res-denoised" alt="Denoised Image"><figcaption>Denoised Image</figcaption></figure>
      <figure><img id="res-noise-map" alt="Noise Removed"><figcaption>Noise Removed</figcaption></figure>
      <figure><img id="res-enhanced" alt="Enhanced Image (CLAHE)"><figcaption>Enhanced Image (CLAHE)</figcaption></figure>
      <figure><img id="res-edges" alt="Edge Detection"><figcaption>Edge Detection</figcaption></figure>
    </div>
  </section>

  <div class="status error hidden" id="status"></div>

  <script>
    var dropZone = document.getElementById('drop-zone');
    var fileInput = document.getElementById('file-input');
    var loadingOverlay = document.getElementById('loading-overlay');
    var resultsSection = document.getElementById('results-section');
    var statusBadge = document.getElementById('api-status');
    var statusEl = document.getElementById('status');
    var summaryText = document.getElementById('summary-text');
    var resetBtn = document.getElementById('reset-btn');

    fetch('/api/health')
      .then(function (r) { return r.json(); })
      .then(function (h) {
        statusBadge.textContent = 'Server ready · v' + h.version;
        statusBadge.classList.add('ready');
      })
      .catch(function () {
        statusBadge.textContent = 'Server unreachable';
        statusBadge.classList.add('error');
      });

    dropZone.addEventListener('click', function () { fileInput.click(); });

    dropZone.addEventListener('dragover', function (e) {
      e.preventDefault();
      dropZone.classList.add('drag-over');
    });

    dropZone.addEventListener('dragleave', function () {
      dropZone.classList.remove('drag-over');
    });

    dropZone.addEventListener('drop', function (e) {
      e.preventDefault();
      dropZone.classList.remove('drag-over');
      if (e.dataTransfer.files.length > 0) handleImage(e.dataTransfer.files[0]);
    });

    fileInput.addEventListener('change', function (e) {
      if (e.target.files.length > 0) handleImage(e.target.files[0]);
    });

    resetBtn.addEventListener('click', function () {
      resultsSection.classList.add('hidden');
      statusEl.classList.add('hidden');
      dropZone.classList.remove('hidden');
      fileInput.value = '';
    });

    function handleImage(file) {
      if (!file.type.startsWith('image/')) {
        showError('Please upload an image file.');
        return;
      }

      var formData = new FormData();
      formData.append('file', file);

      statusEl.classList.add('hidden');
      loadingOverlay.classList.remove('hidden');

      fetch('/api/process', { method: 'POST', body: formData })
        .then(function (r) {
          return r.json().then(function (body) {
            if (!r.ok) throw new Error(body.error && body.error.message || 'Processing failed');
            return body;
          });
        })
        .then(displayResults)
        .catch(function (err) { showError(err.message); })
        .finally(function () { loadingOverlay.classList.add('hidden'); });
    }

    function displayResults(data) {
      document.getElementById('res-resized').src = data.resized.data_url;
      document.getElementById('res-gray').src = data.grayscale.data_url;
      document.getElementById('res-denoised').src = data.denoised.data_url;
      document.getElementById('res-noise-map').src = data.noise_removed.data_url;
      document.getElementById('res-enhanced').src = data.enhanced.data_url;
      document.getElementById('res-edges').src = data.edges.data_url;

      summaryText.textContent = data.source_width + '×' + data.source_height +
        ' source · processed in ' + data.elapsed_ms + ' ms';

      dropZone.classList.add('hidden');
      resultsSection.classList.remove('hidden');
      resultsSection.scrollIntoView({ behavior: 'smooth' });
    }

    function showError(message) {
      statusEl.textContent = message;
      statusEl.classList.remove('hidden');
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_all_six_stage_labels() {
        for label in [
            "Resized Image",
            "Grayscale Image",
            "Denoised Image",
            "Noise Removed",
            "Enhanced Image (CLAHE)",
            "Edge Detection",
        ] {
            assert!(INDEX_HTML.contains(label), "missing label: {label}");
        }
    }

    #[test]
    fn page_is_self_contained() {
        assert!(!INDEX_HTML.contains("http://"));
        assert!(!INDEX_HTML.contains("https://"));
        assert!(INDEX_HTML.contains("/api/process"));
        assert!(INDEX_HTML.contains("/api/health"));
    }
}
