use std::fmt::Write;

use crate::asf::alert::BEEP_SOUND_URL;
use crate::asf::roster::sort_roster;
use crate::asf::{weekly_overview, BoardSnapshot, Schedule, StatusKind};
use crate::display::{banner, format_clock, format_countdown, format_long_date};
use crate::gallery::annotated::{parse_annotated, Segment};
use crate::gallery::content::{ContentError, INSTRUCTION_HINT, MISSING_STEPS_MESSAGE};
use crate::gallery::print::NO_CONTEXT;
use crate::gallery::timeline::{markers, ticks};
use crate::gallery::{AnalysisContent, Catalog, Exercise, PageEntry, PrintSheet, Rating};

/// Escapes text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"/static/style.css\">\n{}</head>\n\
         <body>\n{}\n</body>\n</html>\n",
        escape(title),
        head,
        body
    )
}

/// Reading text with glossary terms as expandable popovers
pub fn render_annotated(text: &str) -> String {
    parse_annotated(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Plain { text } => escape(&text),
            Segment::Term { word, explanation } => format!(
                "<details class=\"term\"><summary>{}</summary>\
                 <span class=\"popover\"><b>Worterklärung</b> {}</span></details>",
                escape(&word),
                escape(&explanation)
            ),
        })
        .collect()
}

fn detail_href(page: &PageEntry) -> String {
    format!("/view/{}", page.path)
}

/// Query string that reproduces an exercise state
pub fn exercise_query(exercise: &Exercise) -> String {
    let mut query = format!("step={}", exercise.active_step);
    if let Some(rating) = exercise.rating {
        let _ = write!(query, "&rating={}", rating);
    }
    if exercise.show_hints {
        query.push_str("&hints=1");
    }
    if exercise.show_writing_help {
        query.push_str("&help=1");
    }
    query
}

fn exercise_link(page: &PageEntry, exercise: &Exercise) -> String {
    escape(&format!("{}?{}", detail_href(page), exercise_query(exercise)))
}

pub fn render_gallery(catalog: &Catalog, query: &str, current_year: i32) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<header class=\"hero\"><h1>{}</h1><p class=\"kicker\">Digitale Bildanalyse</p><p>{}</p></header>\n",
        escape(&catalog.title),
        escape(&catalog.subtitle)
    );

    body.push_str("<section class=\"timeline no-print\"><h2>Chronologische Übersicht</h2><div class=\"axis\">\n");
    for tick in ticks(current_year) {
        let _ = writeln!(
            body,
            "<span class=\"tick\" style=\"left:{:.2}%\">{}</span>",
            tick.position,
            escape(&tick.label)
        );
    }
    for marker in markers(&catalog.pages, current_year) {
        let _ = writeln!(
            body,
            "<a class=\"marker {}\" style=\"left:{:.2}%\" href=\"{}\"><img src=\"{}\" alt=\"{}\"></a>",
            if marker.above { "above" } else { "below" },
            marker.position,
            escape(&detail_href(marker.page)),
            escape(&marker.page.image_url),
            escape(&marker.page.title)
        );
    }
    body.push_str("</div></section>\n");

    let _ = write!(
        body,
        "<form class=\"search\" method=\"get\" action=\"/\"><input type=\"text\" name=\"q\" value=\"{}\" \
         placeholder=\"Suche nach Thema oder Epoche...\"></form>\n<main class=\"cards\">\n",
        escape(query)
    );
    for page in catalog.displayed_pages(query) {
        let _ = write!(
            body,
            "<a class=\"card\" href=\"{}\"><img src=\"{}\" alt=\"\"><span class=\"year\">{}</span>\
             <h3>{}</h3><p>{}</p></a>\n",
            escape(&detail_href(page)),
            escape(page.thumb_url.as_deref().unwrap_or(&page.image_url)),
            page.year,
            escape(&page.title),
            escape(&page.short_text)
        );
    }
    body.push_str("</main>\n");
    let _ = write!(
        body,
        "<footer>&copy; {} • VISUAL HISTORY • DIGITAL ART ANALYSIS</footer>",
        current_year
    );

    // Fragment navigation: #bildanalyse/napoleon opens the detail view
    let head = "<script>if (location.hash.length > 1) { \
                location.replace('/?view=' + encodeURIComponent(location.hash.slice(1))); }</script>\n";
    layout(&catalog.title, head, &body)
}

/// Detail view of one painting. Missing content renders only the error line.
pub fn render_detail(
    page: &PageEntry,
    content: Result<&AnalysisContent, &ContentError>,
    exercise: &Exercise,
) -> String {
    let content = match content {
        Ok(c) => c,
        Err(_) => {
            return layout(
                &page.title,
                "",
                &format!("<div class=\"error\">{}</div>", escape(MISSING_STEPS_MESSAGE)),
            )
        }
    };
    let Some(step) = exercise.current_step(content) else {
        return layout(
            &page.title,
            "",
            &format!("<div class=\"error\">{}</div>", escape(MISSING_STEPS_MESSAGE)),
        );
    };

    let mut body = String::new();
    body.push_str("<nav class=\"steps no-print\"><a class=\"back\" href=\"/\">Galerie</a>\n");
    for (idx, s) in content.steps.iter().enumerate() {
        let target = Exercise {
            active_step: idx,
            ..exercise.clone()
        };
        let _ = writeln!(
            body,
            "<a class=\"step{}\" href=\"{}\">{}</a>",
            if idx == exercise.active_step { " active" } else { "" },
            exercise_link(page, &target),
            escape(&s.icon)
        );
    }
    let _ = writeln!(
        body,
        "<a class=\"print\" href=\"/print/{}?{}\">Drucken</a></nav>",
        escape(&page.path),
        escape(&exercise_query(exercise))
    );
    let _ = writeln!(body, "<p class=\"instruction\">{}</p>", escape(INSTRUCTION_HINT));

    match &step.context_text {
        None => {
            let _ = write!(
                body,
                "<section class=\"stage\"><span class=\"badge\">SCHRITT {} VON {}</span>\
                 <img src=\"{}\" alt=\"{}\"><h2>{}</h2><p class=\"subtitle\">{}</p></section>\n",
                step.number,
                content.steps.len(),
                escape(&page.image_url),
                escape(&page.title),
                escape(&step.title),
                escape(&step.subtitle)
            );
        }
        Some(text) => {
            let _ = write!(
                body,
                "<section class=\"stage context\"><span class=\"badge\">HISTORISCHER KONTEXT</span>\
                 <h2>{} {}</h2><div class=\"reading\">{}</div></section>\n",
                escape(&step.icon),
                escape(&step.title),
                render_annotated(text)
            );
        }
    }

    let _ = writeln!(body, "<p class=\"lead\">{}</p>\n<ol class=\"points\">", escape(&step.description));
    for point in &step.points {
        let _ = writeln!(body, "<li>{}</li>", render_annotated(point));
    }
    body.push_str("</ol>\n");

    let hints_toggle = Exercise {
        show_hints: !exercise.show_hints,
        ..exercise.clone()
    };
    let _ = writeln!(
        body,
        "<a class=\"toggle\" href=\"{}\">🔍 Detektiv-Lupe</a>",
        exercise_link(page, &hints_toggle)
    );
    if exercise.show_hints {
        body.push_str("<ul class=\"hints\">\n");
        for hint in &step.hints {
            let _ = writeln!(body, "<li>★ {}</li>", escape(hint));
        }
        body.push_str("</ul>\n");
    }

    let help_toggle = Exercise {
        show_writing_help: !exercise.show_writing_help,
        ..exercise.clone()
    };
    let _ = writeln!(
        body,
        "<a class=\"toggle\" href=\"{}\">💡 Schreib-Hilfe</a>",
        exercise_link(page, &help_toggle)
    );
    if exercise.show_writing_help {
        body.push_str("<ul class=\"starters\">\n");
        for starter in &step.sentence_starters {
            let _ = writeln!(body, "<li>„{}“</li>", escape(starter));
        }
        body.push_str("</ul>\n");
    }

    if exercise.is_rating_step() {
        body.push_str(
            "<section class=\"rating\"><h4>Glaubwürdigkeits-Check: Zeigt das Bild die Wahrheit?</h4>\n",
        );
        for rating in Rating::ALL {
            let chosen = Exercise {
                rating: Some(rating),
                ..exercise.clone()
            };
            let _ = writeln!(
                body,
                "<a class=\"light {}{}\" href=\"{}\">{}</a>",
                rating,
                if exercise.rating == Some(rating) { " chosen" } else { "" },
                exercise_link(page, &chosen),
                rating.label()
            );
        }
        if let Some(feedback) = exercise.feedback(content) {
            let _ = writeln!(body, "<div class=\"feedback\">{}</div>", escape(feedback));
        }
        body.push_str("</section>\n");
    }

    body.push_str("<nav class=\"pager no-print\">");
    if exercise.can_go_back() {
        let mut back = exercise.clone();
        back.previous();
        let _ = write!(body, "<a href=\"{}\">Zurück</a>", exercise_link(page, &back));
    }
    if exercise.is_last_step(content) {
        let _ = write!(
            body,
            "<a href=\"/print/{}?{}\">{}</a>",
            escape(&page.path),
            escape(&exercise_query(exercise)),
            exercise.forward_label()
        );
    } else {
        let mut forward = exercise.clone();
        forward.next(content);
        let _ = write!(
            body,
            "<a href=\"{}\">{}</a>",
            exercise_link(page, &forward),
            exercise.forward_label()
        );
    }
    body.push_str("</nav>");

    layout(&page.title, "", &body)
}

/// Printable analysis record: base information, one block per step, context, the verdict
pub fn render_print(sheet: &PrintSheet) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<article class=\"print-sheet\"><header><h1>Analyse-Protokoll</h1>\
         <p>Visual History • Bildungsressource</p><p>Name: _______________________________</p>\
         <p>Datum: {}</p></header>\n",
        escape(&sheet.date)
    );
    if sheet.image_url.is_empty() {
        body.push_str("<div class=\"no-image\">Kein Bild geladen</div>\n");
    } else {
        let _ = writeln!(
            body,
            "<img src=\"{}\" alt=\"{}\">",
            escape(&sheet.image_url),
            escape(&sheet.title)
        );
    }
    let _ = write!(
        body,
        "<section class=\"facts\"><h2>Basis-Informationen</h2><dl>\
         <dt>Titel des Werks</dt><dd>{}</dd><dt>Künstler / Maler</dt><dd>{}</dd>\
         <dt>Entstehungsjahr</dt><dd>{}</dd></dl>\
         <p class=\"notes\">Persönliche Notizen zur Bildwirkung...</p></section>\n",
        escape(&sheet.title),
        escape(&sheet.artist),
        escape(&sheet.year)
    );
    for step in &sheet.steps {
        let _ = writeln!(
            body,
            "<section><h2>{} {}. {}</h2><p class=\"subtitle\">{}</p><ul>",
            escape(&step.icon),
            step.number,
            escape(&step.title),
            escape(&step.subtitle)
        );
        for point in &step.points {
            let _ = writeln!(body, "<li>{}</li>", escape(point));
        }
        body.push_str("</ul><div class=\"lines\"></div></section>\n");
    }
    let _ = writeln!(
        body,
        "<section class=\"context\"><h2>⏳ Historischer Kontext</h2><p>{}</p></section>",
        escape(sheet.context.as_deref().unwrap_or(NO_CONTEXT))
    );
    let _ = write!(
        body,
        "<section class=\"verdict {}\"><h2>Ergebnis der Quellenkritik:</h2><p class=\"headline\">{}</p>\
         <p class=\"assessment\">{}</p></section>",
        sheet.rating.map(|r| r.as_str()).unwrap_or("none"),
        escape(&sheet.verdict),
        escape(&sheet.assessment)
    );
    body.push_str(
        "<footer>Digitale Bildanalyse • Protokoll <span>Protokoll-Seite 1 / 1</span></footer></article>",
    );

    layout(&sheet.title, "<script>window.addEventListener('load', () => window.print());</script>\n", &body)
}

/// Whether the page should play the alert sound on this render.
///
/// `seen` is the alert count the page showed last time, carried through the refresh URL.
/// A first visit has none and only records the current count.
fn alert_due(snapshot: &BoardSnapshot, seen: Option<u64>) -> bool {
    seen.is_some_and(|seen| snapshot.alerts_fired > seen)
}

/// Board page. Every refresh carries the alert count forward, so each fired alert beeps once.
pub fn render_board(snapshot: &BoardSnapshot, schedule: &Schedule, seen: Option<u64>) -> String {
    let status = &snapshot.status;
    let b = banner(status.kind);
    let mut body = String::new();

    let _ = write!(
        body,
        "<header class=\"banner {}\"><h1>{}</h1></header>\n<main class=\"board\">\n\
         <section class=\"clock\"><p>{}</p><p class=\"time\">{}</p></section>\n",
        b.style,
        escape(b.message),
        escape(&format_long_date(snapshot.now)),
        format_clock(snapshot.now)
    );

    for session in &status.current_sessions {
        let _ = writeln!(
            body,
            "<section class=\"session active\"><h3>Raum {} - {}</h3><p>{} • bis {}</p><ul>",
            escape(&session.room),
            escape(&session.label),
            escape(&session.teacher),
            session.end_time
        );
        for student in sort_roster(&session.students) {
            let _ = writeln!(body, "<li>{}</li>", escape(student));
        }
        body.push_str("</ul></section>\n");
    }

    if let (Some(next), Some(minutes)) = (&status.next_session, status.minutes_to_start) {
        let heading = if status.kind == StatusKind::Active {
            "Danach"
        } else {
            "Nächste Anschlussförderung"
        };
        let _ = writeln!(
            body,
            "<section class=\"session upcoming\"><h3>{}: {}</h3><p>{} Uhr • Raum {} • {}</p></section>",
            heading,
            escape(&next.label),
            next.start_time,
            escape(&next.room),
            format_countdown(minutes)
        );
    }

    body.push_str("<section class=\"week\"><h2>📅 Wochenplan</h2>\n");
    for group in weekly_overview(schedule) {
        let _ = writeln!(body, "<h4>{}</h4>", group.name);
        for s in &group.sessions {
            let _ = writeln!(
                body,
                "<div class=\"row\"><span>{} • {}</span><span>{} - {}</span></div>",
                escape(&s.label),
                escape(&s.teacher),
                s.start_time,
                s.end_time
            );
        }
    }
    body.push_str("</section>\n");

    let _ = writeln!(
        body,
        "<section class=\"done\"><h2>✅ Erledigt ({})</h2>",
        snapshot.completed_today.len()
    );
    for s in &snapshot.completed_today {
        let _ = writeln!(
            body,
            "<div class=\"row\"><span>{}</span><span>{} - {}</span></div>",
            escape(&s.label),
            s.start_time,
            s.end_time
        );
    }
    body.push_str("</section>\n</main>");

    if alert_due(snapshot, seen) {
        // Browsers may block autoplay; the board works without the sound.
        let _ = write!(body, "\n<audio autoplay src=\"{}\"></audio>", BEEP_SOUND_URL);
    }

    let head = format!(
        "<meta http-equiv=\"refresh\" content=\"30;url=/asf?seen={}\">\n",
        snapshot.alerts_fired
    );
    layout("Anschlussförderung", &head, &body)
}
