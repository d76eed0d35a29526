use crate::command::assert_cmd_snapshot;

fn parse() -> crate::command::Command {
    crate::recur(["parse"])
}

#[test]
fn rrule() {
    assert_cmd_snapshot!(
        parse().args([
            "every 2 weeks on Monday, Wednesday for 10 times",
            "every weekday",
            "Every day until January 2, 2015.",
            "every month on the first friday and the last sunday",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    FREQ=WEEKLY;INTERVAL=2;COUNT=10;BYDAY=MO,WE
    FREQ=WEEKLY;BYDAY=MO,TU,WE,TH,FR
    FREQ=DAILY;UNTIL=20150102T000000Z
    FREQ=MONTHLY;BYDAY=+1FR,-1SU

    ----- stderr -----
    ",
    );
}

#[test]
fn start() {
    assert_cmd_snapshot!(
        parse().args(["--start", "2014-01-01", "every day for 2 times"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    FREQ=DAILY;DTSTART=20140101T000000Z;COUNT=2

    ----- stderr -----
    ",
    );
}

#[test]
fn json() {
    assert_cmd_snapshot!(
        parse().args([
            "--json",
            "--start",
            "2014-01-01",
            "every month on the 1st Friday",
        ]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {"freq":"MONTHLY","dtstart":"20140101T000000Z","byweekday":["+1FR"]}

    ----- stderr -----
    "#,
    );
}

#[test]
fn into_seq() {
    assert_cmd_snapshot!(
        parse()
            .args(["--start", "2014-01-01"])
            .stdin("every day for 2 times\nevery 2 weeks on Friday for 2 times\n")
            .pipe(crate::recur(["seq"])),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-01-01T00:00:00
    2014-01-02T00:00:00
    2014-01-03T00:00:00
    2014-01-17T00:00:00

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        parse()
            .arg("--json")
            .arg("every year in January on the 1st for 2 times")
            .pipe(crate::recur(["seq", "--from", "json", "--start", "2014-01-01"])),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    2014-01-01T00:00:00
    2015-01-01T00:00:00

    ----- stderr -----
    ",
    );
}

#[test]
fn errors() {
    assert_cmd_snapshot!(
        parse().arg("every fortnight"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    failed to parse `every fortnight`: failed to parse recurrence rule: unexpected symbol at `fortnight`
    ",
    );

    assert_cmd_snapshot!(
        parse().arg("every day for 0 times"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    invalid rule from `every day for 0 times`: invalid recurrence rule: count value of `0` is invalid (count must be greater than or equal to 1)
    ",
    );
}
