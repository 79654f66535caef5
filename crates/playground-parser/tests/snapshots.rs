use playground_parser::{parse, StaticRegistry};

fn render(source: &str) -> String {
    let registry = StaticRegistry::indo_ui();
    match parse(source, &registry) {
        Ok(doc) => doc.to_string(),
        Err(err) => {
            let report = err.report(source);
            format!(
                "{} at {}:{}: {}",
                report.code, report.position.line, report.position.column, report.message
            )
        }
    }
}

#[test]
fn test_snapshot_form() {
    let output = render(
        r#"
<IndoUI.Card title="Sign in">
  <IndoUI.Stack gap={3}>
    <IndoUI.Input label="Email" type="email" required={true} />
    <IndoUI.Input label='Password' type="password" />
    <IndoUI.Button variant="primary" onClick={() => submit()}>Continue</IndoUI.Button>
  </IndoUI.Stack>
</IndoUI.Card>
"#,
    );
    insta::assert_snapshot!(output, @r#"<IndoUI.Card title="Sign in"><IndoUI.Stack gap={3}><IndoUI.Input label="Email" type="email" required={true} /><IndoUI.Input label="Password" type="password" /><IndoUI.Button variant="primary" onClick="() => submit()">Continue</IndoUI.Button></IndoUI.Stack></IndoUI.Card>"#);
}

#[test]
fn test_snapshot_mixed_text_and_hosts() {
    let output = render("<Alert status=\"info\">\n  Heads up: <b>3</b> new messages\n</Alert>\n<hr/>");
    insta::assert_snapshot!(output, @r#"
<Alert status="info">Heads up:<b>3</b>new messages</Alert>
<hr />
"#);
}

#[test]
fn test_snapshot_numbers() {
    let output = render("<Slider min={-10} max={10.5} step={0.25} value={007} />");
    insta::assert_snapshot!(output, @"<Slider min={-10} max={10.5} step={0.25} value={7} />");
}

#[test]
fn test_snapshot_unknown_component() {
    let output = render("<IndoUI.Stack>\n  <IndoUI.Carousel />\n  <IndoUI.Chart />\n</IndoUI.Stack>");
    insta::assert_snapshot!(output, @"unknown-component at 3:3: unknown component: <IndoUI.Chart> (inside <IndoUI.Stack>)");
}

#[test]
fn test_snapshot_unclosed() {
    let output = render("<Modal open={true}>\n  <Card>\n    body\n</Modal>");
    insta::assert_snapshot!(output, @"unclosed-tag at 2:3: unclosed tag: <Card> (inside <Modal>)");
}

#[test]
fn test_snapshot_unterminated_tag() {
    let output = render(r#"<Toast message="Saved" "#);
    insta::assert_snapshot!(output, @"malformed-tag at 1:1: malformed tag: tag <Toast> is never terminated by '>' or '/>'");
}
