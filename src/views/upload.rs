use super::{Flash, escape, layout, render_flash};
use crate::entities::documents::{self, DocumentType};

fn type_options() -> String {
    let mut out = String::from(r#"<option value="">Select Document Type</option>"#);
    for ty in DocumentType::ALL {
        out.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            ty.as_str(),
            ty.label()
        ));
    }
    out
}

fn document_rows(documents: &[documents::Model]) -> String {
    let mut out = String::new();
    for doc in documents {
        out.push_str(&format!(
            r#"<tr><td>{label}</td><td>{name}</td><td>{date}</td><td><a class="button secondary" href="/documents/{id}" target="_blank">View</a>
<form method="POST" action="/upload" enctype="multipart/form-data" style="display:inline" onsubmit="return confirm('Delete this document?');">
<input type="hidden" name="action" value="delete_document">
<input type="hidden" name="doc_id" value="{id}">
<button type="submit" class="danger">Delete</button>
</form></td></tr>
"#,
            label = doc.document_type.label(),
            name = escape(&doc.original_filename),
            date = escape(&doc.upload_date),
            id = doc.id,
        ));
    }
    out
}

pub fn render_upload(documents: &[documents::Model], flash: Option<&Flash>) -> String {
    let listing = if documents.is_empty() {
        r#"<p class="muted">No documents uploaded yet.</p>"#.to_string()
    } else {
        format!(
            r#"<table>
<thead><tr><th>Type</th><th>Original Filename</th><th>Upload Date</th><th>Actions</th></tr></thead>
<tbody>
{}</tbody>
</table>"#,
            document_rows(documents)
        )
    };

    let body = format!(
        r#"<h1>Upload Documents</h1>
<p><a href="/">&larr; Back to Logbook</a></p>
{flash}
<div class="panel">
<h2>Upload New Document</h2>
<form method="POST" action="/upload" enctype="multipart/form-data" class="grid">
<input type="hidden" name="action" value="upload_document">
<div><label for="document_type">Document Type</label><select id="document_type" name="document_type" required>{types}</select></div>
<div><label for="document_file">PDF File</label><input type="file" id="document_file" name="document_file" accept=".pdf,application/pdf" required></div>
<div><button type="submit">Upload Document</button></div>
</form>
<p class="muted">Uploading a Pilot License or Drone Registration replaces the previous one.</p>
</div>
<div class="panel">
<h2>Uploaded Documents</h2>
{listing}
</div>"#,
        flash = render_flash(flash),
        types = type_options(),
        listing = listing,
    );

    layout("Upload Documents - Drone Flight Logbook", &body)
}
