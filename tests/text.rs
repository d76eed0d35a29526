use crate::command::assert_cmd_snapshot;

fn text() -> crate::command::Command {
    crate::recur(["text"])
}

#[test]
fn describe() {
    assert_cmd_snapshot!(
        text().args([
            "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;COUNT=10",
            "FREQ=DAILY;UNTIL=20150102T000000Z",
            "FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13",
            "FREQ=YEARLY;BYMONTH=1,3",
            "FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    every 2 weeks on Monday, Wednesday for 10 times
    every day until January 2, 2015
    every month on Friday the 13th
    every January and March
    every day on weekdays

    ----- stderr -----
    ",
    );
}

#[test]
fn from_json() {
    assert_cmd_snapshot!(
        text().args(["--from", "json", r#"{"freq": "MONTHLY", "bymonthday": [1, -1]}"#]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    every month on the 1st and last

    ----- stderr -----
    ",
    );
}

#[test]
fn approximate() {
    assert_cmd_snapshot!(
        text().args(["FREQ=DAILY;BYHOUR=9,17", "FREQ=HOURLY"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    every day (~ approximate)
    Unable to fully convert this rule to text

    ----- stderr -----
    ",
    );

    assert_cmd_snapshot!(
        text().args(["--strict", "FREQ=DAILY;COUNT=2", "FREQ=DAILY;BYHOUR=9,17"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----
    every day for 2 times

    ----- stderr -----
    rule `FREQ=DAILY;BYHOUR=9,17` can only be described approximately: every day (~ approximate)
    ",
    );
}

#[test]
fn stdin() {
    assert_cmd_snapshot!(
        text().stdin("FREQ=YEARLY;INTERVAL=3\n  \nFREQ=WEEKLY\n"),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    every 3 years
    every week

    ----- stderr -----
    ",
    );
}
