/// 品牌标志类别名称
///
/// 下标即类别ID，顺序必须与模型训练时的类别顺序完全一致（不是字母序）。
pub const LOGO_CLASSES: [&str; 27] = [
    "Adidas",
    "Apple",
    "BMW",
    "Citroen",
    "Cocacola",
    "DHL",
    "Fedex",
    "Ferrari",
    "Ford",
    "Google",
    "Heineken",
    "HP",
    "Intel",
    "McDonalds",
    "Mini",
    "Nbc",
    "Nike",
    "Pepsi",
    "Porsche",
    "Puma",
    "RedBull",
    "Sprite",
    "Starbucks",
    "Texaco",
    "Unicef",
    "Vodafone",
    "Yahoo",
];

/// 根据类别ID查找类别名称，超出词表范围时返回None
pub fn label_for(class_id: usize) -> Option<&'static str> {
    LOGO_CLASSES.get(class_id).copied()
}
