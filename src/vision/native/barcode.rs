// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Barcode scanner results

use super::{Point, Rect};

/// A single scanned barcode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Barcode {
    pub bounding_box: Option<Rect>,
    pub corner_points: Option<Vec<Point>>,
    pub raw_value: Option<String>,
    pub display_value: Option<String>,
    /// Symbology bit flag (QR code, EAN-13, ...)
    pub format: i32,
    pub value: BarcodeValue,
}

impl Barcode {
    pub fn value_type(&self) -> i32 {
        self.value.value_type()
    }
}

/// Structured content of a barcode, keyed by its value type
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BarcodeValue {
    #[default]
    Unknown,
    ContactInfo(ContactInfo),
    Email(Email),
    Isbn,
    Phone(Phone),
    Product,
    Sms(Sms),
    Text,
    Url(UrlBookmark),
    Wifi(WiFi),
    Geo(GeoPoint),
    CalendarEvent(CalendarEvent),
    DriverLicense(DriverLicense),
    /// Value type tag outside the known set
    Unrecognized(i32),
}

impl BarcodeValue {
    /// Numeric value type tag
    pub fn value_type(&self) -> i32 {
        match self {
            BarcodeValue::Unknown => 0,
            BarcodeValue::ContactInfo(_) => 1,
            BarcodeValue::Email(_) => 2,
            BarcodeValue::Isbn => 3,
            BarcodeValue::Phone(_) => 4,
            BarcodeValue::Product => 5,
            BarcodeValue::Sms(_) => 6,
            BarcodeValue::Text => 7,
            BarcodeValue::Url(_) => 8,
            BarcodeValue::Wifi(_) => 9,
            BarcodeValue::Geo(_) => 10,
            BarcodeValue::CalendarEvent(_) => 11,
            BarcodeValue::DriverLicense(_) => 12,
            BarcodeValue::Unrecognized(tag) => *tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Email {
    /// 0 unknown, 1 work, 2 home
    pub kind: i32,
    pub address: Option<String>,
    pub body: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Phone {
    pub number: Option<String>,
    /// 0 unknown, 1 work, 2 home, 3 fax, 4 mobile
    pub kind: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sms {
    pub message: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UrlBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WiFi {
    pub ssid: Option<String>,
    pub password: Option<String>,
    /// 1 open, 2 WPA, 3 WEP
    pub encryption_type: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub address_lines: Option<Vec<String>>,
    /// 0 unknown, 1 work, 2 home
    pub kind: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonName {
    pub formatted_name: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub middle: Option<String>,
    pub prefix: Option<String>,
    pub pronunciation: Option<String>,
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactInfo {
    pub addresses: Vec<Address>,
    pub emails: Vec<Email>,
    pub name: Option<PersonName>,
    pub phones: Vec<Phone>,
    pub urls: Option<Vec<String>>,
    pub title: Option<String>,
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarDateTime {
    /// Timestamp exactly as encoded in the barcode
    pub raw_value: Option<String>,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub is_utc: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarEvent {
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub start: Option<CalendarDateTime>,
    pub end: Option<CalendarDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DriverLicense {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub address_city: Option<String>,
    pub address_street: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub birth_date: Option<String>,
    pub document_type: Option<String>,
    pub license_number: Option<String>,
    pub expiry_date: Option<String>,
    pub issue_date: Option<String>,
    pub issuing_country: Option<String>,
}
