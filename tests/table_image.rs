use alarm_slots::*;

const ALARMS: &str = r#"
slots = 8

[[alarms]]
alarm_id = 1
id = 0
day_of_week = 0x1f
hour = 6
minute = 30
second = 0
function_name = 2
is_active = true

[[alarms]]
alarm_id = 4
id = 5
day_of_week = 0x60
hour = 9
minute = 15
second = 30
function_name = 7
is_active = false
"#;

#[test]
fn alarm_file_to_image_and_back() {
    let table = AlarmFile::from_toml(ALARMS).unwrap().into_table().unwrap();

    let image = table.to_image();
    assert_eq!(image.len(), 8 * RECORD_SIZE);
    assert_eq!(
        &image[5 * RECORD_SIZE..6 * RECORD_SIZE],
        &[4, 5, 0x60, 9, 15, 30, 7, 0]
    );

    let decoded = AlarmTable::from_image(&image).unwrap();
    assert_eq!(decoded, table);
    assert_eq!(decoded.to_image(), image);

    let file = AlarmFile::from_table(&decoded).unwrap();
    let reparsed = AlarmFile::from_toml(&file.to_toml().unwrap()).unwrap();
    assert_eq!(reparsed, file);
}

#[test]
fn image_written_by_hand_decodes() {
    let image = decode_hex(
        "00 00 00 00 00 00 00 00
         03 01 02 07 1e 00 05 01",
    )
    .unwrap();
    let table = AlarmTable::from_image(&image).unwrap();
    assert_eq!(table.capacity(), 2);
    assert_eq!(
        table.find_by_alarm_id(3),
        Some(&AlarmRecord::new(3, 1, WEEK_DAYS.tuesday, 7, 30, 0, 5, true))
    );
}

#[test]
fn day_names_build_day_bytes() {
    let days = parse_days("mon,wed,fri").unwrap();
    let record = AlarmRecord::new(0, 0, days, 8, 0, 0, 0, true);
    assert_eq!(
        record.day_of_week,
        WEEK_DAYS.monday | WEEK_DAYS.wednesday | WEEK_DAYS.friday
    );
}
