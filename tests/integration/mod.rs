mod fcs_tests;
